//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Email for the new account
    #[arg(long)]
    pub email: String,

    /// Password for the new account
    #[arg(long, env = "JUDGE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(global: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let api = session::connect(global)?;

    eprintln!("{}", "Creating account...".dimmed());

    let response = api
        .register(&args.username, &args.email, &args.password, &args.password)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    println!();
    output::field("User", response.username.as_deref().unwrap_or(&args.username));
    output::field("Email", response.email.as_deref().unwrap_or(&args.email));
    if response.tokens.is_none() {
        eprintln!("{}", "No session issued. Run 'judge login' to sign in.".dimmed());
    }

    Ok(())
}
