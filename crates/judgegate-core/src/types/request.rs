//! HTTP request and response types.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{Error, HttpError};
use crate::types::ApiUrl;

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against the API, described relative to the base URL.
///
/// This is what callers hand to the gateway. It carries no credentials;
/// the gateway renders it into an [`HttpRequest`] with the current bearer
/// token each time it is attempted, so a replay is the same request with a
/// fresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Render this request against a base URL.
    ///
    /// `bearer` is attached as the `Authorization` header when present.
    pub fn render(&self, base: &ApiUrl, bearer: Option<&str>) -> Result<HttpRequest, Error> {
        let mut url = base.endpoint(&self.path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        let mut headers = self.headers.clone();
        if let Some(bearer) = bearer {
            headers.push(("Authorization".to_string(), bearer.to_string()));
        }

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body: self.body.clone(),
        })
    }
}

/// One concrete HTTP exchange handed to a request executor.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Authorization values stay out of logs
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A response received from the server, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// The body, lossily decoded as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn this response into an [`HttpError`].
    pub fn into_error(self) -> HttpError {
        HttpError::new(self.status, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> ApiUrl {
        ApiUrl::new("http://127.0.0.1:8000/api/v1/").unwrap()
    }

    #[test]
    fn render_attaches_bearer_and_query() {
        let request = ApiRequest::get("save-code/")
            .query("problem_id", 3)
            .query_opt("language", Some("cpp"))
            .query_opt::<u32>("user_id", None);

        let rendered = request.render(&base(), Some("Bearer A1")).unwrap();

        assert_eq!(
            rendered.url.as_str(),
            "http://127.0.0.1:8000/api/v1/save-code/?problem_id=3&language=cpp"
        );
        assert_eq!(rendered.header("authorization"), Some("Bearer A1"));
        assert_eq!(rendered.method, Method::Get);
    }

    #[test]
    fn render_without_token_omits_header() {
        let rendered = ApiRequest::get("user/").render(&base(), None).unwrap();
        assert!(rendered.header("Authorization").is_none());
    }

    #[test]
    fn json_body_is_carried() {
        let request = ApiRequest::post("execute/run/")
            .json(&json!({"code": "print(1)", "language": "py"}))
            .unwrap();
        let rendered = request.render(&base(), None).unwrap();
        assert_eq!(rendered.body.unwrap()["language"], "py");
    }

    #[test]
    fn debug_redacts_authorization() {
        let rendered = ApiRequest::get("user/")
            .render(&base(), Some("Bearer secret-token"))
            .unwrap();
        let debug = format!("{:?}", rendered);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn response_helpers() {
        let ok = HttpResponse::new(200, br#"{"id":1}"#.to_vec());
        assert!(ok.is_success());
        let value: serde_json::Value = ok.json().unwrap();
        assert_eq!(value["id"], 1);

        let denied = HttpResponse::new(401, "nope");
        assert!(denied.is_unauthorized());
        assert_eq!(denied.into_error(), HttpError::new(401, "nope"));
    }
}
