//! Command-line interface layer.
//!
//! Everything user-facing lives here: argument parsing, the extraction pass
//! orchestration, and the colored summary. The `core` and `emit` modules stay
//! usable as a library without it.

use std::process::ExitCode;

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod report;

pub use args::{Arguments, Command, CommonArgs, ExtractCommand};
pub use commands::extract::{ExtractSummary, FileOutcome, run_pass};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let verbose = args.verbose();

    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match command {
        Command::Extract(cmd) => {
            let summary = commands::extract::extract(cmd)?;
            report::print_extract(&summary, verbose);
            if summary.failures.is_empty() {
                ExitStatus::Success
            } else {
                ExitStatus::Failure
            }
        }
        Command::Init => commands::init::init()?,
    };

    Ok(status.into())
}
