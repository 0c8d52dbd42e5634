//! In-process doubles for gateway tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use judgegate_core::{
    AccessToken, CredentialStore, HttpRequest, HttpResponse, MemoryCredentialStore,
    RefreshToken, RequestExecutor, SessionObserver, TokenPair, TransportError,
};

pub const BASE_URL: &str = "http://127.0.0.1:8000/api/v1/";
pub const REFRESH_PATH: &str = "/api/v1/token/refresh/";

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

/// An executor that answers from a closure and records every request.
pub struct ScriptedExecutor {
    handler: Box<Handler>,
    delays: Vec<(String, Duration)>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedExecutor {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delays: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hold responses for `path` for `delay` before answering.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.push((path.to_string(), delay));
        self
    }

    pub fn calls_to(&self, path: &str) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .iter()
            .filter(|r| r.url.path() == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.calls_to(path).len()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().push(request.clone());

        let delay = self
            .delays
            .iter()
            .find(|(path, _)| path == request.url.path())
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        (self.handler)(&request)
    }
}

pub fn json_response(status: u16, value: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, value.to_string())
}

#[derive(Debug, Default)]
pub struct CountingObserver {
    calls: AtomicUsize,
}

impl CountingObserver {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionObserver for CountingObserver {
    fn on_session_expired(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A memory store that counts writes and clears.
#[derive(Debug)]
pub struct CountingStore {
    inner: MemoryCredentialStore,
    sets: AtomicUsize,
    clears: AtomicUsize,
}

impl CountingStore {
    pub fn new(access: &str, refresh: &str) -> Self {
        Self {
            inner: MemoryCredentialStore::with_tokens(
                AccessToken::new(access),
                Some(RefreshToken::new(refresh)),
            ),
            sets: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn tokens(&self) -> Option<TokenPair> {
        self.inner.tokens()
    }

    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_tokens(access, refresh);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear();
    }
}
