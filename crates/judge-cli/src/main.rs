//! judge - CLI client for the online judge.
//!
//! A thin wrapper over the `judgegate` library. Every authenticated command
//! goes through the gateway, so an expired access token is refreshed
//! transparently and a dead session is reported once.

mod cli;
mod commands;
mod logging;
mod output;
mod session;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use cli::Cli;

/// Exit status when the command failed because the session ended.
const EXIT_SESSION_EXPIRED: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match commands::handle(&cli.global, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            exit_code(&err)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let expired = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<judgegate::Error>())
        .any(judgegate::Error::is_session_expired);
    if expired {
        ExitCode::from(EXIT_SESSION_EXPIRED)
    } else {
        ExitCode::FAILURE
    }
}
