//! Session lifecycle observer.

use std::fmt;

/// Notified when the session is terminated by a failed refresh.
///
/// Called exactly once per failed refresh, however many requests were
/// waiting on it, and before any of them sees the resulting error.
pub trait SessionObserver: Send + Sync {
    fn on_session_expired(&self);
}

/// An observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_session_expired(&self) {}
}

/// An observer backed by a closure.
pub struct FnObserver<F>(F);

impl<F> FnObserver<F>
where
    F: Fn() + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> SessionObserver for FnObserver<F>
where
    F: Fn() + Send + Sync,
{
    fn on_session_expired(&self) {
        (self.0)()
    }
}

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}
