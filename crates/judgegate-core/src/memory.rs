//! In-memory credential store.

use parking_lot::RwLock;

use crate::tokens::{AccessToken, RefreshToken, TokenPair};
use crate::traits::CredentialStore;

/// A credential store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding credentials.
    pub fn with_tokens(access: AccessToken, refresh: Option<RefreshToken>) -> Self {
        Self {
            tokens: RwLock::new(Some(TokenPair::new(access, refresh))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().clone()
    }

    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) {
        let mut tokens = self.tokens.write();
        let refresh = refresh.or_else(|| tokens.as_ref().and_then(|t| t.refresh.clone()));
        *tokens = Some(TokenPair::new(access, refresh));
    }

    fn clear(&self) {
        *self.tokens.write() = None;
    }
}
