//! Error types for judgegate.
//!
//! The gateway either passes an error through unchanged or translates a
//! failed token refresh into [`Error::SessionExpired`]. Nothing is swallowed.

use std::fmt;
use thiserror::Error;

/// The unified error type for gateway operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (connection failure, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status outside the managed 401 path.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// The request was still rejected with 401 after a successful refresh.
    #[error("authentication rejected after token refresh: {0}")]
    AuthRetryExhausted(HttpError),

    /// The refresh exchange failed and the session was terminated.
    #[error("session expired: {0}")]
    SessionExpired(RefreshFailure),

    /// Input validation errors (bad base URL, bad request path).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A successful response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl Error {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) | Error::AuthRetryExhausted(err) => Some(err.status),
            _ => None,
        }
    }

    /// Whether this error ended the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::SessionExpired(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Any other failure before a response arrived.
    #[error("request failed: {message}")]
    Other { message: String },
}

/// A non-2xx HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, byte for byte.
    pub body: Vec<u8>,
}

impl HttpError {
    /// Create a new HTTP error.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Extract a human-readable message from a JSON error body.
    ///
    /// Understands `{"detail": ..}`, `{"error": ..}` and `{"message": ..}`.
    pub fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        ["detail", "error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(detail) = self.detail() {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

/// Why a refresh exchange failed.
///
/// Cloned out to every caller waiting on the same refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshFailure {
    /// The store held no refresh token; no exchange was attempted.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// The refresh exchange never got a response.
    #[error("refresh request failed: {0}")]
    Transport(TransportError),

    /// The refresh endpoint answered 2xx with an unusable body.
    #[error("malformed refresh response: {message}")]
    MalformedResponse { message: String },

    /// The exchange task ended without publishing an outcome.
    #[error("refresh exchange was interrupted")]
    Interrupted,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A request path that cannot be joined onto the base URL.
    #[error("invalid request path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
