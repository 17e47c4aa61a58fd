//! Termargs CLI Library
//!
//! This crate provides the command-line interface for termargs, a tool for
//! converting between argument vectors and the command-line strings the
//! POSIX shell and Windows C runtime conventions expect.
//!
//! # Examples
//!
//! The CLI binary (`termargs`) can be used in several ways:
//!
//! ```bash
//! # Join a program and its arguments for the current platform
//! termargs join -- /usr/bin/printf '%s' "it's"
//!
//! # Join for the other platform's convention
//! termargs join --windows -- 'C:\Path to\main.exe' 'Call Me Ishmael'
//!
//! # Split a captured command line, one argument per line
//! termargs split --posix "program 'a b' c"
//!
//! # Show the command line of a running process
//! termargs detect --pid 1234
//! ```

pub mod cli_args;
