//! Authenticated request gateway.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};

use judgegate_core::{
    AccessToken, ApiRequest, CredentialStore, Error, HttpResponse, RequestExecutor, Result,
    SessionObserver,
};

use crate::config::GatewayConfig;
use crate::coordinator::RefreshCoordinator;

/// Sends API requests with the current bearer token, refreshing it on 401.
///
/// A request that is rejected with 401 waits for a token refresh (shared with
/// every other request rejected at the same time) and is then replayed
/// exactly once. Responses other than 401 are returned as they are.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use judgegate::{AuthenticatedGateway, GatewayConfig};
/// use judgegate_core::{ApiRequest, MemoryCredentialStore, NoopObserver, RequestExecutor};
///
/// # async fn example(executor: Arc<dyn RequestExecutor>) -> Result<(), judgegate_core::Error> {
/// let gateway = AuthenticatedGateway::new(
///     GatewayConfig::default(),
///     executor,
///     Arc::new(MemoryCredentialStore::new()),
///     Arc::new(NoopObserver),
/// )?;
///
/// let response = gateway.send(ApiRequest::get("user/")).await?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthenticatedGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    config: GatewayConfig,
    executor: Arc<dyn RequestExecutor>,
    store: Arc<dyn CredentialStore>,
    coordinator: RefreshCoordinator,
}

impl AuthenticatedGateway {
    /// Create a gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh path cannot be resolved against the
    /// base URL.
    pub fn new(
        config: GatewayConfig,
        executor: Arc<dyn RequestExecutor>,
        store: Arc<dyn CredentialStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self> {
        let coordinator = RefreshCoordinator::new(
            Arc::clone(&executor),
            Arc::clone(&store),
            observer,
            config.refresh_url()?,
        );

        Ok(Self {
            inner: Arc::new(GatewayInner {
                config,
                executor,
                store,
                coordinator,
            }),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// The credential store this gateway reads from.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    /// Send a request with the current credentials.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if no response was received
    /// - [`Error::Http`] for any non-2xx status other than a refreshed 401
    /// - [`Error::SessionExpired`] if the token refresh failed
    /// - [`Error::AuthRetryExhausted`] if the replay after a refresh was
    ///   also rejected with 401
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
        let (epoch, token) = self.inner.coordinator.snapshot();
        let response = self.attempt(&request, token.as_ref()).await?;

        if !response.is_unauthorized() {
            return into_result(response);
        }

        debug!("Access token rejected, waiting for refresh");
        if let Err(failure) = self.inner.coordinator.refresh_since(epoch).await {
            return Err(Error::SessionExpired(failure));
        }

        let token = self.inner.store.access_token();
        let response = self.attempt(&request, token.as_ref()).await?;

        if response.is_unauthorized() {
            warn!("Request rejected again after token refresh");
            return Err(Error::AuthRetryExhausted(response.into_error()));
        }

        into_result(response)
    }

    /// Send a request without credentials and without refresh handling.
    ///
    /// Used for endpoints that establish a session, such as login.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send_unauthenticated(&self, request: ApiRequest) -> Result<HttpResponse> {
        let response = self.attempt(&request, None).await?;
        into_result(response)
    }

    /// Send a request and decode the JSON response.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    /// GET `path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    /// POST a JSON body to `path`, ignoring the response body.
    pub async fn post_json_no_response<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::post(path).json(body)?).await?;
        Ok(())
    }

    async fn attempt(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<HttpResponse> {
        let bearer = token.map(AccessToken::bearer);
        let http = request.render(&self.inner.config.base_url, bearer.as_deref())?;

        let response = self.inner.executor.execute(http).await?;
        trace!(status = response.status, "Response received");
        Ok(response)
    }
}

fn into_result(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(Error::Http(response.into_error()))
    }
}

impl std::fmt::Debug for AuthenticatedGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedGateway")
            .field("base_url", &self.inner.config.base_url)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
