//! Dispatch between the POSIX and Windows tokenizers.
//!
//! Callers that just want "whatever the target platform expects" go through
//! [`Convention`], which picks the grammar by platform convention only,
//! never by sniffing the input.

use crate::error::Result;
use crate::{posix, windows};

/// A command-line quoting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Posix,
    Windows,
}

impl Convention {
    /// The convention of the platform this binary was compiled for.
    #[must_use]
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }
}

/// Joins command-line arguments (the ones following the program name) under
/// the given convention.
pub fn join_arguments(convention: Convention, arguments: &[String]) -> String {
    match convention {
        Convention::Posix => posix::join_arguments(arguments),
        Convention::Windows => windows::join_arguments(arguments),
    }
}

/// Joins a program name and its arguments into a full command line under
/// the given convention.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidCommand`] for unusable argument
/// vectors; see the per-convention functions for the exact rules.
pub fn join_command_line(convention: Convention, arguments: &[String]) -> Result<String> {
    match convention {
        Convention::Posix => posix::join_command_line(arguments),
        Convention::Windows => windows::join_command_line(arguments),
    }
}

/// Splits command-line arguments (the ones following the program name)
/// under the given convention.
///
/// # Errors
///
/// Returns [`crate::error::Error::QuotesMismatch`] for unterminated POSIX
/// quotes; the Windows grammar has no failing inputs here.
pub fn split_arguments(convention: Convention, arguments: &str) -> Result<Vec<String>> {
    match convention {
        Convention::Posix => posix::split_arguments(arguments),
        Convention::Windows => Ok(windows::split_arguments(arguments)),
    }
}

/// Splits a full command line (program name included) under the given
/// convention.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidCommandLine`] for blank input or
/// an empty result, and [`crate::error::Error::QuotesMismatch`] for
/// unterminated POSIX quotes.
pub fn split_command_line(convention: Convention, command_line: &str) -> Result<Vec<String>> {
    match convention {
        Convention::Posix => posix::split_command_line(command_line),
        Convention::Windows => windows::split_command_line(command_line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_native_convention_matches_platform() {
        if cfg!(windows) {
            assert_eq!(Convention::native(), Convention::Windows);
        } else {
            assert_eq!(Convention::native(), Convention::Posix);
        }
    }

    #[test]
    fn test_dispatch_selects_the_right_grammar() {
        let vector = args(&["program", "a b"]);
        assert_eq!(
            join_command_line(Convention::Posix, &vector).unwrap(),
            "program 'a b'"
        );
        assert_eq!(
            join_command_line(Convention::Windows, &vector).unwrap(),
            "program \"a b\""
        );
    }

    #[test]
    fn test_dispatch_round_trips() {
        let vector = args(&["program", "a b", "c"]);
        for convention in [Convention::Posix, Convention::Windows] {
            let command_line = join_command_line(convention, &vector).unwrap();
            assert_eq!(
                split_command_line(convention, &command_line).unwrap(),
                vector
            );
        }
    }

    #[test]
    fn test_split_arguments_dispatch() {
        assert_eq!(
            split_arguments(Convention::Posix, "'a b' c").unwrap(),
            args(&["a b", "c"])
        );
        assert_eq!(
            split_arguments(Convention::Windows, "\"a b\" c").unwrap(),
            args(&["a b", "c"])
        );
    }
}
