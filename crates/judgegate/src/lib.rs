//! judgegate - Authenticated request gateway for the judge API
//!
//! Every authenticated call flows through an [`AuthenticatedGateway`]. When
//! the server rejects an access token with 401, the gateway waits on a single
//! shared token refresh and replays the request once. Concurrent rejections
//! never trigger more than one refresh.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use judgegate::{AuthenticatedGateway, GatewayConfig, JudgeApi, Difficulty};
//! use judgegate_core::{ApiUrl, MemoryCredentialStore, NoopObserver, RequestExecutor};
//!
//! # async fn example(executor: Arc<dyn RequestExecutor>) -> Result<(), judgegate::Error> {
//! let config = GatewayConfig::new(ApiUrl::new("https://judge.example.com/api/v1/")?);
//! let gateway = AuthenticatedGateway::new(
//!     config,
//!     executor,
//!     Arc::new(MemoryCredentialStore::new()),
//!     Arc::new(NoopObserver),
//! )?;
//!
//! let api = JudgeApi::new(gateway);
//! api.login("ada@example.com", "password").await?;
//!
//! for problem in api.problems(Some(Difficulty::Easy)).await? {
//!     println!("{}", problem.problem_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod coordinator;
pub mod gateway;

#[cfg(test)]
mod test_support;

// Re-export primary types at crate root for convenience
pub use api::{
    AuthResponse, Difficulty, JudgeApi, Language, ProblemDetail, ProblemSummary, ReviewKind,
    RunResult, SavedCode, SubmitResult, Submission, Tag, User,
};
pub use config::{DEFAULT_BASE_URL, DEFAULT_REFRESH_PATH, GatewayConfig};
pub use coordinator::{Epoch, RefreshCoordinator, RefreshOutcome};
pub use gateway::AuthenticatedGateway;
pub use judgegate_core::{Error, Result};
