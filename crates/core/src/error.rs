use std::fmt::{Display, Formatter};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Direction of a codepage conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOperation {
    Encode,
    Decode,
}

impl Display for ConversionOperation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode => formatter.write_str("encode"),
            Self::Decode => formatter.write_str("decode"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("The command arguments are not usable: {}", .reason)]
    InvalidCommand {
        arguments: Vec<String>,
        reason: String,
    },

    #[error("Invalid command line: `{}`", .0)]
    InvalidCommandLine(String),

    #[error("Mismatched quotes in command line: `{}`", .0)]
    QuotesMismatch(String),

    #[error("Failed to {} `{}` with codepage {}", .operation, .text, .codepage)]
    CodepageConversion {
        operation: ConversionOperation,
        codepage: u16,
        text: String,
    },

    #[error("Failed to detect the console codepage: {}", .0)]
    CodepageDetection(String),
}

impl Error {
    pub fn invalid_command(arguments: &[String], reason: &str) -> Self {
        Self::InvalidCommand {
            arguments: arguments.to_vec(),
            reason: reason.to_string(),
        }
    }

    pub fn codepage_conversion(
        operation: ConversionOperation,
        codepage: u16,
        text: String,
    ) -> Self {
        Self::CodepageConversion {
            operation,
            codepage,
            text,
        }
    }
}
