//! Gateway configuration.

use url::Url;

use judgegate_core::{ApiUrl, Result};

/// Base URL used when the host does not supply one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1/";

/// Path of the refresh endpoint, relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "token/refresh/";

/// Where the gateway sends requests and refresh exchanges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: ApiUrl,
    pub refresh_path: String,
}

impl GatewayConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }

    /// Override the refresh endpoint path.
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Absolute URL of the refresh endpoint.
    pub fn refresh_url(&self) -> Result<Url> {
        self.base_url.endpoint(&self.refresh_path)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let base_url = ApiUrl::new(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self::new(base_url)
    }
}
