//! Conversion between UTF-8 and legacy Windows codepages.
//!
//! Command lines captured from (or handed to) a Windows console are encoded
//! in the console's active codepage rather than UTF-8. This module converts
//! in both directions, given the numeric codepage identifier. Detecting
//! which codepage is active belongs to the caller (see
//! [`crate::detector::detect_codepage`] on Windows).

use crate::error::{ConversionOperation, Error, Result};

/// The codepage number Windows assigns to UTF-8. Conversion is a no-op.
pub const UTF8_CODEPAGE: u16 = 65001;

/// Decodes bytes in the given codepage into an UTF-8 string.
///
/// # Errors
///
/// Returns [`Error::CodepageConversion`] if the codepage is unknown or the
/// byte sequence is not valid for it.
pub fn decode(bytes: &[u8], codepage: u16) -> Result<String> {
    let decode_error = || {
        Error::codepage_conversion(
            ConversionOperation::Decode,
            codepage,
            String::from_utf8_lossy(bytes).into_owned(),
        )
    };

    if codepage == UTF8_CODEPAGE {
        return String::from_utf8(bytes.to_vec()).map_err(|_| decode_error());
    }

    let encoding = codepage::to_encoding(codepage).ok_or_else(decode_error)?;
    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(decoded) => Ok(decoded.into_owned()),
        None => Err(decode_error()),
    }
}

/// Encodes an UTF-8 string into the given codepage.
///
/// # Errors
///
/// Returns [`Error::CodepageConversion`] if the codepage is unknown or the
/// string contains characters it cannot represent.
pub fn encode(text: &str, codepage: u16) -> Result<Vec<u8>> {
    let encode_error =
        || Error::codepage_conversion(ConversionOperation::Encode, codepage, text.to_string());

    if codepage == UTF8_CODEPAGE {
        return Ok(text.as_bytes().to_vec());
    }

    let encoding = codepage::to_encoding(codepage).ok_or_else(encode_error)?;
    let (encoded, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(encode_error());
    }

    Ok(encoded.into_owned())
}
