//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "JUDGE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let api = session::connect(global)?;

    eprintln!("{}", "Logging in...".dimmed());

    let response = api
        .login(&args.email, &args.password)
        .await
        .context("Failed to login")?;

    if response.tokens.is_none() {
        anyhow::bail!("Login response did not include tokens");
    }

    output::success("Logged in successfully");
    println!();
    if let Some(user) = response.user() {
        output::field("User", &user.username);
        output::field("Email", &user.email);
    }
    output::field("API", &global.api_url);

    Ok(())
}
