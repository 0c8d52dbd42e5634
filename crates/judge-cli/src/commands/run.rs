//! Run code command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use judgegate::Language;

use super::read_source;
use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source file to run ("-" for stdin)
    pub file: PathBuf,

    /// Language of the source (py, java, cpp, c)
    #[arg(long, short)]
    pub language: Language,

    /// Input passed to the program
    #[arg(long, default_value = "", conflicts_with = "input_file")]
    pub input: String,

    /// Read program input from a file
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    let code = read_source(&args.file)?;
    let input = match &args.input_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => args.input.clone(),
    };

    let api = session::connect_authenticated(global)?;

    eprintln!("{}", "Running...".dimmed());

    let result = api
        .run_code(&code, &input, args.language)
        .await
        .context("Failed to run code")?;

    if args.json {
        return output::json_pretty(&result);
    }

    if result.is_success() {
        output::success(&result.status);
    } else {
        output::failure(&result.status);
    }
    if let Some(time) = result.execution_time {
        output::field("Time", &format!("{:.3}s", time));
    }
    if let Some(details) = &result.details {
        output::field("Details", details);
    }
    if let Some(stdout) = &result.output {
        println!();
        print!("{}", stdout);
        if !stdout.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
