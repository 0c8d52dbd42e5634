//! List problems command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use judgegate::{Difficulty, ProblemSummary};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ProblemsArgs {
    /// Only list problems of this difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: ProblemsArgs) -> Result<()> {
    let api = session::connect_authenticated(global)?;

    let problems = api
        .problems(args.difficulty)
        .await
        .context("Failed to list problems")?;

    if args.json {
        return output::json_pretty(&problems);
    }

    if problems.is_empty() {
        eprintln!("{}", "No problems found.".dimmed());
        return Ok(());
    }

    for problem in &problems {
        println!("{}", format_row(problem));
    }

    Ok(())
}

fn format_row(problem: &ProblemSummary) -> String {
    let id = problem
        .id
        .map(|id| format!("{:>4}", id))
        .unwrap_or_else(|| "   -".to_string());
    let difficulty = match problem.difficulty {
        Difficulty::Easy => "Easy".green(),
        Difficulty::Medium => "Medium".yellow(),
        Difficulty::Hard => "Hard".red(),
    };
    let tags: Vec<&str> = problem.tags.iter().map(|t| t.tag.as_str()).collect();

    if tags.is_empty() {
        format!("{}  {:<8} {}", id, difficulty, problem.problem_name)
    } else {
        format!(
            "{}  {:<8} {} {}",
            id,
            difficulty,
            problem.problem_name,
            format!("[{}]", tags.join(", ")).dimmed()
        )
    }
}
