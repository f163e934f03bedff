//! CLI module for revstore
//!
//! Provides command-line inspection of a document's history:
//! - log: list revisions
//! - show: one revision with its change summaries
//! - verify: replay the history file and report

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{log, run_command, show, verify};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_response};

use crate::observability::{Logger, Severity};

/// Parse arguments and run the requested command.
///
/// Failures are reported as a JSON error envelope on stdout and returned.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    // stdout carries the JSON response; only errors may be logged.
    Logger::set_min_severity(Severity::Error);

    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            write_error(e.code(), &e.to_string())?;
            Err(e)
        }
    }
}
