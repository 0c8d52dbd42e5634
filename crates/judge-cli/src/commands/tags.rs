//! List tags command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Print the tags as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: TagsArgs) -> Result<()> {
    let api = session::connect_authenticated(global)?;

    let tags = api.tags().await.context("Failed to list tags")?;

    if args.json {
        return output::json_pretty(&tags);
    }

    if tags.is_empty() {
        eprintln!("{}", "No tags found.".dimmed());
    }
    for tag in &tags {
        println!("{:>4}  {}", tag.id, tag.tag);
    }

    Ok(())
}
