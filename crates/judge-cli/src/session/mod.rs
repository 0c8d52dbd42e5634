//! Wiring of the judge client for CLI commands.

pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use judgegate::{AuthenticatedGateway, GatewayConfig, JudgeApi};
use judgegate_core::{ApiUrl, FnObserver};
use judgegate_file::FileCredentialStore;
use judgegate_http::ReqwestExecutor;

use crate::cli::GlobalArgs;
use crate::output;

/// Build a judge client backed by the persisted credentials.
pub fn connect(global: &GlobalArgs) -> Result<JudgeApi> {
    let api_url = ApiUrl::new(&global.api_url).context("Invalid API URL")?;

    let path = storage::credentials_path()?;
    debug!(path = %path.display(), api = %api_url, "Connecting");
    let store = FileCredentialStore::open(&path)
        .with_context(|| format!("Failed to load credentials from {}", path.display()))?;

    let executor = ReqwestExecutor::builder()
        .timeout(Duration::from_secs(global.timeout_secs))
        .user_agent(concat!("judge/", env!("JUDGE_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let gateway = AuthenticatedGateway::new(
        GatewayConfig::new(api_url),
        Arc::new(executor),
        Arc::new(store),
        Arc::new(FnObserver::new(output::session_expired)),
    )
    .context("Invalid gateway configuration")?;

    Ok(JudgeApi::new(gateway))
}

/// Build a judge client, requiring stored credentials.
pub fn connect_authenticated(global: &GlobalArgs) -> Result<JudgeApi> {
    let api = connect(global)?;
    if api.gateway().store().tokens().is_none() {
        anyhow::bail!("Not logged in. Run 'judge login' first.");
    }
    Ok(api)
}
