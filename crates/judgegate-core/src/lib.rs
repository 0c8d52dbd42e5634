//! judgegate-core - Core types and traits for the judgegate gateway.
//!
//! This crate holds everything the gateway and its collaborators share:
//! request/response types, token newtypes, the executor/store/observer
//! traits, and the error taxonomy. It performs no I/O of its own.

pub mod error;
pub mod memory;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod wire;

pub use error::{Error, HttpError, InvalidInputError, RefreshFailure, TransportError};
pub use memory::MemoryCredentialStore;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{CredentialStore, FnObserver, NoopObserver, RequestExecutor, SessionObserver};
pub use types::{ApiRequest, ApiUrl, HttpRequest, HttpResponse, Method};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
