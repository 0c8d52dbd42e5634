//! Subcommand implementations.

mod login;
mod logout;
mod problem;
mod problems;
mod refresh_token;
mod register;
mod review;
mod run;
mod submissions;
mod submit;
mod tags;
mod whoami;

use anyhow::{Context, Result};
use clap::Subcommand;

use judgegate::JudgeApi;

use crate::cli::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session tokens
    Login(login::LoginArgs),

    /// Create an account and log in
    Register(register::RegisterArgs),

    /// Revoke the session and forget stored tokens
    Logout(logout::LogoutArgs),

    /// Display the logged-in user
    Whoami(whoami::WhoamiArgs),

    /// Exchange the refresh token for a new access token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// List problems
    Problems(problems::ProblemsArgs),

    /// Show a problem statement
    Problem(problem::ProblemArgs),

    /// List problem tags
    Tags(tags::TagsArgs),

    /// Run code against custom input
    Run(run::RunArgs),

    /// Submit code for judging
    Submit(submit::SubmitArgs),

    /// List past submissions
    Submissions(submissions::SubmissionsArgs),

    /// Ask the AI reviewer about a solution
    Review(review::ReviewArgs),
}

pub async fn handle(global: &GlobalArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(global, args).await,
        Commands::Register(args) => register::run(global, args).await,
        Commands::Logout(args) => logout::run(global, args).await,
        Commands::Whoami(args) => whoami::run(global, args).await,
        Commands::RefreshToken(args) => refresh_token::run(global, args).await,
        Commands::Problems(args) => problems::run(global, args).await,
        Commands::Problem(args) => problem::run(global, args).await,
        Commands::Tags(args) => tags::run(global, args).await,
        Commands::Run(args) => run::run(global, args).await,
        Commands::Submit(args) => submit::run(global, args).await,
        Commands::Submissions(args) => submissions::run(global, args).await,
        Commands::Review(args) => review::run(global, args).await,
    }
}

/// Resolve the user id, asking the server when it was not given.
async fn resolve_user_id(api: &JudgeApi, user_id: Option<u64>) -> Result<u64> {
    match user_id {
        Some(id) => Ok(id),
        None => Ok(api
            .current_user()
            .await
            .context("Failed to fetch current user")?
            .id),
    }
}

/// Read source code from a file, or stdin when the path is "-".
fn read_source(path: &std::path::Path) -> Result<String> {
    if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read code from stdin")
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}
