//! Termargs Core Library
//!
//! This crate converts between a process's argument vector and the single
//! command-line string a shell or OS process-creation API expects, for the
//! two incompatible conventions in common use: POSIX `sh` quoting and the
//! Windows C runtime argument grammar (the 2008 rules used by
//! `CommandLineToArgvW`-compatible parsers).
//!
//! # Key Features
//!
//! - **Round-trip fidelity**: splitting a command line produced by the
//!   matching joiner always recovers the original vector, including embedded
//!   quotes, backslashes, whitespace, and non-ASCII text
//! - **Both conventions**: POSIX and Windows tokenizers with a platform
//!   dispatch layer that never sniffs the input
//! - **Codepage handling**: conversion between UTF-8 and legacy Windows
//!   console codepages at the command-line boundary
//! - **Process introspection**: a small collaborator for reading the
//!   command line the OS recorded for a running process
//! - **Error Handling**: one error type covering every failure mode
//!
//! # Examples
//!
//! Building a POSIX command line and taking it apart again:
//!
//! ```
//! use termargs_core::posix;
//!
//! let vector = vec!["printf".to_string(), "%s".to_string(), "it's".to_string()];
//! let command_line = posix::join_command_line(&vector)?;
//! assert_eq!(command_line, r"printf '%s' 'it'\''s'");
//! assert_eq!(posix::split_command_line(&command_line)?, vector);
//! # Ok::<(), termargs_core::error::Error>(())
//! ```

pub mod codepage;
pub mod command_line;
pub mod detector;
pub mod error;
pub mod posix;
pub mod windows;
