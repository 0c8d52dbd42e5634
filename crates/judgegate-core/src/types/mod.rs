//! Request, response and URL types.
//!
//! These types enforce their invariants at construction time, so the
//! gateway never has to re-validate a base URL or a request path.

mod api_url;
mod request;

pub use api_url::ApiUrl;
pub use request::{ApiRequest, HttpRequest, HttpResponse, Method};
