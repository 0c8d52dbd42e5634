//! AI review command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use judgegate::{Language, ReviewKind};

use super::read_source;
use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Problem id the code was written for
    pub problem_id: u64,

    /// Source file to review ("-" for stdin); not needed for hints
    pub file: Option<PathBuf>,

    /// What to ask for (code-review, add-comment, optimized-code, bug-fix, hint)
    #[arg(long, short, default_value = "code-review")]
    pub kind: ReviewKind,

    /// Language of the source (py, java, cpp, c)
    #[arg(long, short, default_value = "py")]
    pub language: Language,
}

pub async fn run(global: &GlobalArgs, args: ReviewArgs) -> Result<()> {
    let code = match &args.file {
        Some(path) => read_source(path)?,
        None if args.kind == ReviewKind::ProvideHints => String::new(),
        None => bail!("A source file is required for {}", args.kind),
    };

    let api = session::connect_authenticated(global)?;

    let problem = api
        .problem(args.problem_id)
        .await
        .with_context(|| format!("Failed to fetch problem {}", args.problem_id))?;

    eprintln!("{}", "Waiting for review...".dimmed());

    let review = api
        .ai_review(args.kind, &problem, &code, args.language)
        .await
        .context("AI review failed")?;

    output::heading(&format!("{} ({})", problem.problem_name, args.kind));
    println!("{}", review);

    Ok(())
}
