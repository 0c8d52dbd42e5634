use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Isolated CLI environment with its own credentials file.
pub struct CliEnv {
    _dir: TempDir,
    pub credentials: PathBuf,
    pub api_url: String,
}

impl CliEnv {
    pub fn new(api_url: impl Into<String>) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let credentials = dir.path().join("credentials.json");
        Self {
            _dir: dir,
            credentials,
            api_url: api_url.into(),
        }
    }

    /// Seed the credentials file as if a previous login had succeeded.
    pub fn with_tokens(self, access: &str, refresh: &str) -> Self {
        let json = serde_json::json!({"access": access, "refresh": refresh});
        std::fs::write(&self.credentials, json.to_string()).expect("Failed to seed credentials");
        self
    }

    /// Read back the stored credentials, if any.
    pub fn stored(&self) -> Option<serde_json::Value> {
        let content = std::fs::read_to_string(&self.credentials).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Run the CLI binary off the async runtime.
    pub async fn run(&self, args: &[&str]) -> Output {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let credentials = self.credentials.clone();
        let api_url = self.api_url.clone();
        tokio::task::spawn_blocking(move || run_cli_with_env(&args, &credentials, &api_url))
            .await
            .expect("CLI task panicked")
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub async fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

/// Run the CLI binary with an explicit credentials file and API URL.
pub fn run_cli_with_env<S: AsRef<str>>(args: &[S], credentials: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_judge"));
    cmd.args(args.iter().map(|a| a.as_ref()));
    cmd.env("JUDGE_CREDENTIALS_FILE", credentials);
    cmd.env("JUDGE_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}
