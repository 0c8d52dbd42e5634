//! List submissions command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use judgegate::Submission;

use super::resolve_user_id;
use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct SubmissionsArgs {
    /// Only list submissions for this problem name
    #[arg(long)]
    pub problem: Option<String>,

    /// List submissions of this user id instead of the logged-in user
    #[arg(long)]
    pub user_id: Option<u64>,

    /// Print the submissions as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: SubmissionsArgs) -> Result<()> {
    let api = session::connect_authenticated(global)?;
    let user_id = resolve_user_id(&api, args.user_id).await?;

    let submissions = match &args.problem {
        Some(name) => api.problem_submissions(user_id, name).await,
        None => api.submissions(user_id).await,
    }
    .context("Failed to list submissions")?;

    if args.json {
        return output::json_pretty(&submissions);
    }

    if submissions.is_empty() {
        eprintln!("{}", "No submissions found.".dimmed());
        return Ok(());
    }

    for submission in &submissions {
        println!("{}", format_row(submission));
    }

    Ok(())
}

fn format_row(submission: &Submission) -> String {
    let verdict = match submission.verdict.as_deref() {
        Some("Accepted") => "Accepted".green(),
        Some(other) => other.red(),
        None => "Pending".dimmed(),
    };
    let time = submission
        .time_taken
        .map(|t| format!("{:.3}s", t))
        .unwrap_or_default();

    format!(
        "{}  {:<20} {:<4} {:<20} {}",
        submission
            .timestamp
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed(),
        submission.problem_name,
        submission.language.as_str(),
        verdict,
        time
    )
}
