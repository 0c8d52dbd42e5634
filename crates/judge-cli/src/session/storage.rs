//! Location of the persisted credentials.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use judgegate_file::CREDENTIALS_FILE_NAME;

/// Environment variable that overrides the credentials file location.
pub const CREDENTIALS_FILE_ENV: &str = "JUDGE_CREDENTIALS_FILE";

/// Get the credentials file path.
pub fn credentials_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CREDENTIALS_FILE_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let dirs = ProjectDirs::from("", "", "judge").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join(CREDENTIALS_FILE_NAME))
}
