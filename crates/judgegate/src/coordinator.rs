//! Single-flight token refresh.
//!
//! However many requests discover an expired access token at the same time,
//! only one refresh exchange goes out. Everyone who asks while it is in
//! flight waits on a shared [`watch`] channel and receives the same outcome.
//!
//! The exchange runs in its own task. Dropping a caller's future, including
//! the one that started the exchange, leaves the exchange and the other
//! waiters untouched.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

use judgegate_core::wire::{RefreshRequest, RefreshResponse};
use judgegate_core::{
    AccessToken, CredentialStore, HttpRequest, Method, RefreshFailure, RefreshToken,
    RequestExecutor, SessionObserver,
};

/// Result of one refresh exchange, shared by everyone who waited on it.
pub type RefreshOutcome = Result<(), RefreshFailure>;

type OutcomeReceiver = watch::Receiver<Option<RefreshOutcome>>;
type OutcomeSender = watch::Sender<Option<RefreshOutcome>>;

/// Identifies a settled refresh window.
///
/// Captured alongside the access token a request was sent with, so a 401
/// that arrives after a refresh already settled reuses that refresh instead
/// of starting another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Epoch(u64);

enum RefreshState {
    Idle,
    Refreshing(OutcomeReceiver),
}

struct Shared {
    state: RefreshState,
    epoch: Epoch,
    last_outcome: Option<RefreshOutcome>,
}

/// Coordinates token refresh across concurrent requests.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    executor: Arc<dyn RequestExecutor>,
    store: Arc<dyn CredentialStore>,
    observer: Arc<dyn SessionObserver>,
    refresh_url: Url,
    shared: Mutex<Shared>,
}

impl RefreshCoordinator {
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        store: Arc<dyn CredentialStore>,
        observer: Arc<dyn SessionObserver>,
        refresh_url: Url,
    ) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                executor,
                store,
                observer,
                refresh_url,
                shared: Mutex::new(Shared {
                    state: RefreshState::Idle,
                    epoch: Epoch(0),
                    last_outcome: None,
                }),
            }),
        }
    }

    /// Whether a refresh exchange is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        matches!(self.inner.shared.lock().state, RefreshState::Refreshing(_))
    }

    /// The current access token together with the epoch it belongs to.
    ///
    /// A successful refresh installs the new tokens before it advances the
    /// epoch, so the token may be newer than the epoch but never older. A
    /// request that pairs the old epoch with the new token and is still
    /// rejected joins or reuses the same window rather than starting another.
    pub fn snapshot(&self) -> (Epoch, Option<AccessToken>) {
        let shared = self.inner.shared.lock();
        (shared.epoch, self.inner.store.access_token())
    }

    /// Refresh the access token, or join the refresh already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_inner(None).await
    }

    /// Refresh on behalf of a request sent during `seen`.
    ///
    /// If a refresh has settled since then, its outcome is returned straight
    /// away and no new exchange is started.
    pub async fn refresh_since(&self, seen: Epoch) -> RefreshOutcome {
        self.refresh_inner(Some(seen)).await
    }

    #[instrument(skip(self), fields(url = %self.inner.refresh_url))]
    async fn refresh_inner(&self, seen: Option<Epoch>) -> RefreshOutcome {
        let mut rx = match self.join_or_start(seen) {
            Ok(rx) => rx,
            Err(settled) => {
                debug!("Refresh already settled since request was sent");
                return settled;
            }
        };

        // Bound to a local so the borrow of `rx` ends before `rx` drops.
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone().unwrap_or(Err(RefreshFailure::Interrupted)),
            Err(_) => Err(RefreshFailure::Interrupted),
        };
        outcome
    }

    /// Returns a receiver for the in-flight exchange, starting one if needed,
    /// or the outcome of a window that settled after `seen`.
    fn join_or_start(&self, seen: Option<Epoch>) -> Result<OutcomeReceiver, RefreshOutcome> {
        let mut shared = self.inner.shared.lock();

        if let RefreshState::Refreshing(rx) = &shared.state {
            debug!("Joining in-flight refresh");
            return Ok(rx.clone());
        }

        if let Some(seen) = seen
            && seen != shared.epoch
            && let Some(outcome) = shared.last_outcome.clone()
        {
            return Err(outcome);
        }

        let (tx, rx) = watch::channel(None);
        shared.state = RefreshState::Refreshing(rx.clone());
        drop(shared);

        info!("Starting token refresh");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut settle = SettleGuard {
                inner,
                tx: Some(tx),
            };
            let outcome = settle.inner.exchange().await;
            settle.settle(outcome);
        });

        Ok(rx)
    }
}

impl CoordinatorInner {
    /// Perform the refresh exchange directly against the executor.
    async fn exchange(&self) -> Result<RefreshResponse, RefreshFailure> {
        let refresh_token = self
            .store
            .refresh_token()
            .ok_or(RefreshFailure::MissingRefreshToken)?;

        let body = serde_json::to_value(RefreshRequest {
            refresh: refresh_token.as_str(),
        })
        .map_err(|e| RefreshFailure::MalformedResponse {
            message: e.to_string(),
        })?;

        let request = HttpRequest {
            method: Method::Post,
            url: self.refresh_url.clone(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        };

        let response = self
            .executor
            .execute(request)
            .await
            .map_err(RefreshFailure::Transport)?;
        trace!(status = response.status, "Refresh response");

        if !response.is_success() {
            return Err(RefreshFailure::Rejected {
                status: response.status,
            });
        }

        response
            .json::<RefreshResponse>()
            .map_err(|e| RefreshFailure::MalformedResponse {
                message: e.to_string(),
            })
    }
}

/// Publishes the outcome of an exchange and returns the coordinator to idle.
///
/// If the exchange task unwinds before settling, the drop path ends the
/// session with [`RefreshFailure::Interrupted`] so no waiter is left hanging.
struct SettleGuard {
    inner: Arc<CoordinatorInner>,
    tx: Option<OutcomeSender>,
}

impl SettleGuard {
    fn settle(&mut self, result: Result<RefreshResponse, RefreshFailure>) {
        let inner = Arc::clone(&self.inner);
        match result {
            Ok(response) => {
                // Store IO may block, so it runs outside the coordinator lock.
                inner.store.set_tokens(
                    AccessToken::new(response.access),
                    response.refresh.map(RefreshToken::new),
                );
                info!("Token refresh succeeded");
                let mut shared = inner.shared.lock();
                self.publish(&mut shared, Ok(()));
            }
            Err(failure) => {
                warn!(%failure, "Token refresh failed, ending session");
                self.expire(failure);
            }
        }
    }

    /// End the session: forget credentials and notify the observer before
    /// any waiter sees the failure.
    fn expire(&mut self, failure: RefreshFailure) {
        let inner = Arc::clone(&self.inner);
        inner.store.clear();
        inner.observer.on_session_expired();

        let mut shared = inner.shared.lock();
        self.publish(&mut shared, Err(failure));
    }

    fn publish(&mut self, shared: &mut Shared, outcome: RefreshOutcome) {
        shared.state = RefreshState::Idle;
        shared.epoch = Epoch(shared.epoch.0 + 1);
        shared.last_outcome = Some(outcome.clone());
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(outcome));
        }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if self.tx.is_some() {
            warn!("Refresh exchange ended without an outcome, ending session");
            self.expire(RefreshFailure::Interrupted);
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.inner.refresh_url.as_str())
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}
