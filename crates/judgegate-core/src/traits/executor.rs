//! Request executor trait.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{HttpRequest, HttpResponse};

/// Performs a single HTTP exchange.
///
/// Any response the server sends back, whatever its status, is `Ok`.
/// `Err` means no response was received at all; timeouts belong here.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
