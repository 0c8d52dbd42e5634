//! Refresh token command implementation.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(global: &GlobalArgs, _args: RefreshTokenArgs) -> Result<()> {
    let api = session::connect_authenticated(global)?;

    eprintln!("{}", "Refreshing session...".dimmed());

    api.gateway()
        .coordinator()
        .refresh()
        .await
        .map_err(|failure| anyhow!("Failed to refresh session: {}", failure))?;

    output::success("Session refreshed successfully");

    Ok(())
}
