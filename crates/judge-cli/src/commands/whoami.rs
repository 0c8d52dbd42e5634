//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(global: &GlobalArgs, args: WhoamiArgs) -> Result<()> {
    let api = session::connect_authenticated(global)?;

    let user = api
        .current_user()
        .await
        .context("Failed to fetch current user")?;

    if args.json {
        return output::json_pretty(&user);
    }

    output::field("ID", &user.id.to_string());
    output::field("User", &user.username);
    output::field("Email", &user.email);
    output::field("API", &global.api_url);

    Ok(())
}
