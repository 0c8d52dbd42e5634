//! Show problem command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ProblemArgs {
    /// Problem id
    pub id: u64,

    /// Print the problem as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: ProblemArgs) -> Result<()> {
    let api = session::connect_authenticated(global)?;

    let problem = api
        .problem(args.id)
        .await
        .with_context(|| format!("Failed to fetch problem {}", args.id))?;

    if args.json {
        return output::json_pretty(&problem);
    }

    output::heading(&problem.problem_name);
    output::field("Difficulty", problem.difficulty.as_str());
    if !problem.tags.is_empty() {
        let tags: Vec<&str> = problem.tags.iter().map(|t| t.tag.as_str()).collect();
        output::field("Tags", &tags.join(", "));
    }
    println!();
    println!("{}", problem.problem_statement);

    if let Some(input_format) = &problem.input_format {
        println!();
        output::heading("Input");
        println!("{}", input_format);
    }
    if let Some(output_format) = &problem.output_format {
        println!();
        output::heading("Output");
        println!("{}", output_format);
    }

    println!();
    output::heading("Constraints");
    println!("{}", problem.constraints);

    for (i, example) in problem.test_examples.iter().enumerate() {
        println!();
        output::heading(&format!("Example {}", i + 1));
        output::field("Input", &example.input_data);
        output::field("Output", &example.output_data);
    }

    Ok(())
}
