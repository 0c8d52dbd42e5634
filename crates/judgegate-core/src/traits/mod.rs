//! Collaborator traits consumed by the gateway.

mod executor;
mod observer;
mod store;

pub use executor::RequestExecutor;
pub use observer::{FnObserver, NoopObserver, SessionObserver};
pub use store::CredentialStore;
