//! Determining the command line the OS recorded for a running process.
//!
//! The tokenizers never touch the OS; this module is the one collaborator
//! that does. [`CommandLineSource`] is the seam: the shipped implementation
//! shells out to an OS utility (`ps` on POSIX systems, `wmic` on Windows),
//! tests substitute their own.

use std::process::Command;

use log::{debug, warn};

use crate::error::Result;

/// Where raw process command lines come from.
///
/// `Ok(None)` means the command line is unavailable (utility missing,
/// lookup failed, unexpected output); errors are reserved for output that
/// was obtained but could not be decoded.
pub trait CommandLineSource {
    fn command_line(&self, pid: u32) -> Result<Option<String>>;
}

/// Fetches command lines by shelling out to the platform's process-listing
/// utility. On Windows the utility answers in the console codepage, so the
/// output is decoded with the configured codepage identifier.
#[derive(Debug, Clone)]
pub struct OsCommandLineSource {
    #[cfg_attr(not(windows), allow(dead_code))]
    codepage: u16,
}

impl OsCommandLineSource {
    #[must_use]
    pub fn new(codepage: u16) -> Self {
        Self { codepage }
    }
}

impl Default for OsCommandLineSource {
    fn default() -> Self {
        Self::new(crate::codepage::UTF8_CODEPAGE)
    }
}

impl CommandLineSource for OsCommandLineSource {
    #[cfg(not(windows))]
    fn command_line(&self, pid: u32) -> Result<Option<String>> {
        let output = match Command::new("ps")
            .args(["-o", "args", "--pid", &pid.to_string()])
            .output()
        {
            Ok(output) => output,
            Err(error) => {
                warn!("Failed to run ps: {error}");
                return Ok(None);
            }
        };
        if !output.status.success() {
            debug!("ps exited with {} for pid {pid}", output.status);
            return Ok(None);
        }

        Ok(single_payload_line(&output.stdout)
            .map(|line| String::from_utf8_lossy(line).into_owned()))
    }

    #[cfg(windows)]
    fn command_line(&self, pid: u32) -> Result<Option<String>> {
        let output = match Command::new("wmic")
            .args([
                "path",
                "win32_process",
                "where",
                &format!("Processid={pid}"),
                "get",
                "Commandline",
            ])
            .output()
        {
            Ok(output) => output,
            Err(error) => {
                warn!("Failed to run wmic: {error}");
                return Ok(None);
            }
        };
        if !output.status.success() {
            debug!("wmic exited with {} for pid {pid}", output.status);
            return Ok(None);
        }

        match single_payload_line(&output.stdout) {
            Some(line) => Ok(Some(crate::codepage::decode(line, self.codepage)?)),
            None => Ok(None),
        }
    }
}

/// Extracts the single payload line from utility output: exactly one
/// non-blank line after the header, or nothing.
fn single_payload_line(stdout: &[u8]) -> Option<&[u8]> {
    let mut lines = stdout
        .split(|&byte| byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace));
    let _header = lines.next()?;
    let payload = lines.next()?;
    if lines.next().is_some() {
        return None;
    }

    Some(payload)
}

/// Detects the active console codepage by running `chcp` and parsing the
/// trailing number of its single output line.
///
/// # Errors
///
/// Returns [`crate::error::Error::CodepageDetection`] with the utility
/// output when it can't be run or the output doesn't end in a number.
#[cfg(windows)]
pub fn detect_codepage() -> Result<u16> {
    use crate::error::Error;

    let output = Command::new("cmd")
        .args(["/c", "chcp"])
        .output()
        .map_err(|error| Error::CodepageDetection(error.to_string()))?;
    let text = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        return Err(Error::CodepageDetection(text.trim().to_string()));
    }

    let trimmed = text.trim_end().trim_end_matches('.');
    let digits: String = trimmed
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits
        .parse()
        .map_err(|_| Error::CodepageDetection(text.trim().to_string()))
}
