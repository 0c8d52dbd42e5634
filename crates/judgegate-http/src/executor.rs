//! HTTP executor over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument, trace};

use judgegate_core::{
    Error, HttpRequest, HttpResponse, InvalidInputError, Method, RequestExecutor, TransportError,
};

/// Timeout applied to each exchange unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_USER_AGENT: &str = concat!("judgegate/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ReqwestExecutor`].
#[derive(Debug, Clone)]
pub struct ReqwestExecutorBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestExecutorBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReqwestExecutorBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the executor.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<ReqwestExecutor, Error> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(|e| TransportError::Other {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(ReqwestExecutor {
            client,
            timeout: self.timeout,
        })
    }
}

/// Executes requests with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestExecutor {
    /// Create an executor with default settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Create an executor whose exchanges give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        Self::builder().timeout(timeout).build()
    }

    pub fn builder() -> ReqwestExecutorBuilder {
        ReqwestExecutorBuilder::default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn prepare(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, Error> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                InvalidInputError::Other {
                    message: format!("invalid header name '{}'", name),
                }
            })?;
            // Never echo the value, it may be a token
            let value = HeaderValue::from_str(value).map_err(|_| InvalidInputError::Other {
                message: format!("invalid value for header '{}'", name),
            })?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .headers(headers);

        if let Some(body) = &request.body {
            if !request.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body.to_string());
        }

        Ok(builder)
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Other {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("Sending request");

        let builder = self.prepare(&request).map_err(|e| TransportError::Other {
            message: e.to_string(),
        })?;

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        trace!(status, len = body.len(), "Received response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
