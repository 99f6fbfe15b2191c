//! Request and response values passed across the [`crate::Transport`] seam.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// HTTP verbs the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing call. `path` is relative to the API root and may carry a
/// query string (`owners?page=0&size=10`).
#[derive(Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            bearer: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Path without its query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

// Bearer tokens stay out of Debug output so requests can be logged.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Status, content type and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, Some("application/json".to_string()), value.to_string())
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, Some("text/plain".to_string()), body)
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, None, String::new())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the server declared a JSON content type.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }

    pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Log-safe summary of a response body: length and a hash, never content.
pub fn summarize_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_strips_query() {
        let request = ApiRequest::get("owners?page=0&size=10");
        assert_eq!(request.route(), "owners");
        assert_eq!(ApiRequest::get("owners/5").route(), "owners/5");
    }

    #[test]
    fn test_debug_redacts_bearer() {
        let request = ApiRequest::get("owners").with_bearer("secret-token");
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_json_detection() {
        assert!(ApiResponse::json(200, &json!({})).is_json());
        assert!(ApiResponse::new(200, Some("application/json;charset=UTF-8".into()), "{}").is_json());
        assert!(!ApiResponse::text(200, "ok").is_json());
        assert!(!ApiResponse::empty(204).is_json());
    }

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::empty(200).is_success());
        assert!(ApiResponse::empty(204).is_success());
        assert!(!ApiResponse::empty(301).is_success());
        assert!(!ApiResponse::empty(401).is_success());
    }

    #[test]
    fn test_summarize_body_hides_content() {
        let summary = summarize_body("{\"token\":\"abc\"}");
        assert!(summary.starts_with("len=15,digest="));
        assert!(!summary.contains("abc"));
    }
}
