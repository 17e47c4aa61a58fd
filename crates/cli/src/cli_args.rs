//! Command-line argument parsing and validation.
//!
//! This module defines the command-line interface structure for the
//! `termargs` binary using the `clap` crate.

use clap::{Parser, Subcommand};
use termargs_core::command_line::Convention;

/// Command-line arguments for the termargs CLI tool.
///
/// The binary exposes one subcommand per direction of the conversion, plus
/// process-command-line detection.
#[derive(Parser, Debug)]
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join arguments into a single command-line string.
    Join(JoinArgs),

    /// Split a command-line string into its arguments, one per output line.
    Split(SplitArgs),

    /// Print the command line the OS recorded for a running process.
    Detect(DetectArgs),
}

/// Which quoting convention to apply. With neither flag, the convention of
/// the current platform is used.
#[derive(clap::Args, Debug)]
pub struct ConventionArgs {
    /// Use the Windows C runtime argument grammar.
    #[arg(long, action)]
    pub windows: bool,

    /// Use POSIX sh quoting rules.
    #[arg(long, action, conflicts_with = "windows")]
    pub posix: bool,
}

impl ConventionArgs {
    #[must_use]
    pub fn convention(&self) -> Convention {
        if self.windows {
            Convention::Windows
        } else if self.posix {
            Convention::Posix
        } else {
            Convention::native()
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct JoinArgs {
    #[command(flatten)]
    pub convention: ConventionArgs,

    /// Treat the input as bare arguments, without a leading program name.
    ///
    /// Without this flag the first argument is the program name and gets
    /// the program-specific quoting rules.
    #[arg(long, action)]
    pub args_only: bool,

    /// Encode the result into this Windows codepage before printing.
    ///
    /// 65001 means UTF-8 (no conversion). Only meaningful together with
    /// `--windows`.
    #[arg(long, requires = "windows")]
    pub codepage: Option<u16>,

    /// The arguments to join.
    #[arg(num_args(1..), required = true)]
    pub arguments: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub convention: ConventionArgs,

    /// Treat the input as bare arguments, without a leading program name.
    #[arg(long, action)]
    pub args_only: bool,

    /// Parse with the pre-2008 Windows grammar revision.
    ///
    /// Only meaningful together with `--windows`.
    #[arg(long = "pre-2008", action, requires = "windows")]
    pub pre_2008: bool,

    /// The command line to split.
    #[arg(num_args(1))]
    pub command_line: String,
}

#[derive(clap::Args, Debug)]
pub struct DetectArgs {
    /// The process id to inspect. Defaults to the current process.
    #[arg(long, short = 'p')]
    pub pid: Option<u32>,

    /// The codepage the console output is encoded in (Windows only).
    ///
    /// When omitted, the active console codepage is detected.
    #[arg(long)]
    pub codepage: Option<u16>,
}
