use std::io::{stdout, Write};
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use termargs_core::command_line;
use termargs_core::detector::{CommandLineSource, OsCommandLineSource};
use termargs_core::error::Result;
use termargs_core::windows;

use crate::cli_args::{Args, Command, DetectArgs, JoinArgs, SplitArgs};

mod cli_args;

fn write_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut out = stdout();
    out.write_all(bytes)?;
    out.write_all(b"\n")
}

fn join(args: &JoinArgs) -> Result<ExitCode> {
    let convention = args.convention.convention();
    debug!(
        "Joining {} argument(s) as {convention:?}",
        args.arguments.len()
    );

    if let Some(codepage) = args.codepage {
        let encoded = if args.args_only {
            windows::join_arguments_encoded(&args.arguments, codepage)?
        } else {
            windows::join_command_line_encoded(&args.arguments, codepage)?
        };
        if let Err(error) = write_bytes(&encoded) {
            eprintln!("Failed to write the command line: {error}");
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let joined = if args.args_only {
        command_line::join_arguments(convention, &args.arguments)
    } else {
        command_line::join_command_line(convention, &args.arguments)?
    };
    println!("{joined}");

    Ok(ExitCode::SUCCESS)
}

fn split(args: &SplitArgs) -> Result<ExitCode> {
    let convention = args.convention.convention();
    debug!("Splitting as {convention:?}");

    let arguments = if args.pre_2008 {
        let rules = windows::SplitRules::Pre2008;
        if args.args_only {
            windows::split_arguments_with_rules(&args.command_line, rules)
        } else {
            windows::split_command_line_with_rules(&args.command_line, rules)?
        }
    } else if args.args_only {
        command_line::split_arguments(convention, &args.command_line)?
    } else {
        command_line::split_command_line(convention, &args.command_line)?
    };
    for argument in &arguments {
        println!("{argument}");
    }

    Ok(ExitCode::SUCCESS)
}

fn detect(args: &DetectArgs) -> Result<ExitCode> {
    let codepage = match args.codepage {
        Some(codepage) => codepage,
        None => default_codepage()?,
    };
    let pid = args.pid.unwrap_or_else(std::process::id);
    debug!("Detecting the command line of process {pid} (codepage {codepage})");

    let source = OsCommandLineSource::new(codepage);
    match source.command_line(pid)? {
        Some(raw) => {
            println!("{raw}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No command line available for process {pid}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(windows)]
fn default_codepage() -> Result<u16> {
    termargs_core::detector::detect_codepage()
}

#[cfg(not(windows))]
fn default_codepage() -> Result<u16> {
    Ok(termargs_core::codepage::UTF8_CODEPAGE)
}

fn execute() -> Result<ExitCode> {
    let args = Args::parse();

    match &args.command {
        Command::Join(join_args) => join(join_args),
        Command::Split(split_args) => split(split_args),
        Command::Detect(detect_args) => detect(detect_args),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
