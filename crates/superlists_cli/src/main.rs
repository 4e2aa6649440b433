//! `superlists` command-line entry point.
//!
//! Exit status: 0 on success, 1 when input was rejected by a validation
//! rule, 2 on any other failure.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use commands::{execute, CommandStatus};
use log::error;
use std::process::ExitCode;
use superlists_core::{default_log_level, init_logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let mut stdout = std::io::stdout().lock();
    match execute(&cli, &mut stdout) {
        Ok(CommandStatus::Done) => ExitCode::SUCCESS,
        Ok(CommandStatus::Rejected(field_error)) => {
            eprintln!("{field_error}");
            ExitCode::from(1)
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
