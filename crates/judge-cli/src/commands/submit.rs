//! Submit code command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use judgegate::Language;

use super::{read_source, resolve_user_id};
use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Problem id
    pub problem: u64,

    /// Source file to submit ("-" for stdin)
    pub file: PathBuf,

    /// Language of the source (py, java, cpp, c)
    #[arg(long, short)]
    pub language: Language,

    /// Submit as this user id instead of the logged-in user
    #[arg(long)]
    pub user_id: Option<u64>,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: SubmitArgs) -> Result<()> {
    let code = read_source(&args.file)?;

    let api = session::connect_authenticated(global)?;
    let user_id = resolve_user_id(&api, args.user_id).await?;

    eprintln!("{}", "Judging...".dimmed());

    let result = api
        .submit_code(user_id, args.problem, &code, args.language)
        .await
        .context("Failed to submit code")?;

    if args.json {
        return output::json_pretty(&result);
    }

    if result.is_accepted() {
        output::success(&result.verdict);
    } else {
        output::failure(&result.verdict);
    }
    if !result.details.is_empty() {
        output::field("Details", &result.details);
    }

    Ok(())
}
