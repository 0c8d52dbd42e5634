//! judgegate-http - reqwest-backed request executor.

mod executor;

pub use executor::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ReqwestExecutor, ReqwestExecutorBuilder};
