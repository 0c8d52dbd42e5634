//! Wire types for the token refresh endpoint.

use serde::{Deserialize, Serialize};

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Successful response from the refresh endpoint.
///
/// The server may rotate the refresh token; when it does not, the stored
/// one stays valid.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_response_without_rotation() {
        let response: RefreshResponse = serde_json::from_str(r#"{"access":"A2"}"#).unwrap();
        assert_eq!(response.access, "A2");
        assert!(response.refresh.is_none());
    }

    #[test]
    fn refresh_response_missing_access_is_rejected() {
        assert!(serde_json::from_str::<RefreshResponse>(r#"{"refresh":"R2"}"#).is_err());
    }

    #[test]
    fn refresh_request_shape() {
        let body = serde_json::to_value(RefreshRequest { refresh: "R1" }).unwrap();
        assert_eq!(body, serde_json::json!({"refresh": "R1"}));
    }
}
