//! Credential store trait.

use crate::tokens::{AccessToken, RefreshToken, TokenPair};

/// Holds the current session credentials.
///
/// Implementations must make [`set_tokens`](Self::set_tokens) and
/// [`clear`](Self::clear) atomic with respect to readers: a reader sees the
/// old pair or the new pair, never a mix.
///
/// The refresh task calls these methods directly, so slow persistence delays
/// the waiters of that refresh. Persisting must not hold a lock that
/// [`tokens`](Self::tokens) needs.
pub trait CredentialStore: Send + Sync {
    /// Snapshot of the stored credentials, if any.
    fn tokens(&self) -> Option<TokenPair>;

    /// Replace the stored credentials.
    ///
    /// A `None` refresh token keeps the currently stored one.
    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>);

    /// Forget all credentials.
    fn clear(&self);

    fn access_token(&self) -> Option<AccessToken> {
        self.tokens().map(|pair| pair.access)
    }

    fn refresh_token(&self) -> Option<RefreshToken> {
        self.tokens().and_then(|pair| pair.refresh)
    }
}
