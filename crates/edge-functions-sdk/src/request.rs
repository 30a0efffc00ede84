//! HTTP Request representation for handlers

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an incoming HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: String,

    /// Request path (e.g., "/signup")
    pub path: String,

    /// Query parameters
    #[serde(default)]
    pub query: HashMap<String, String>,

    /// HTTP headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request body, `None` when the client sent nothing
    #[serde(default)]
    pub body: Option<String>,

    /// Client IP address
    #[serde(default)]
    pub client_ip: Option<String>,

    /// Request ID for tracing
    #[serde(default)]
    pub request_id: String,
}

impl Request {
    /// Parse the body as JSON into a typed struct.
    ///
    /// # Example
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct Signup { email: String }
    ///
    /// let signup: Signup = req.json()?;
    /// ```
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HandlerError> {
        let body = self.body.as_deref().unwrap_or("null");
        serde_json::from_str(body)
            .map_err(|e| HandlerError::BadRequest(format!("Invalid JSON: {}", e)))
    }

    /// Get a query parameter as a string reference.
    pub fn query_param(&self, key: &str) -> Option<&String> {
        self.query.get(key)
    }

    /// Get a header value (case-insensitive lookup).
    ///
    /// # Example
    /// ```ignore
    /// let auth = req.header("Authorization"); // Works with any case
    /// let content_type = req.header("content-type");
    /// ```
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Check if request method matches (case-insensitive).
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// Get the Content-Type header value.
    pub fn content_type(&self) -> Option<&String> {
        self.header("Content-Type")
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            client_ip: None,
            request_id: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut req = Request::default();
        req.headers.insert("content-type".to_string(), "application/json".to_string());

        assert_eq!(req.content_type().map(String::as_str), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE").map(String::as_str), Some("application/json"));
        assert!(req.header("Authorization").is_none());
    }

    #[test]
    fn test_json_body() {
        let req = Request {
            method: "POST".to_string(),
            body: Some(r#"{"foo":"bar"}"#.to_string()),
            ..Default::default()
        };

        let value: serde_json::Value = req.json().unwrap();
        assert_eq!(value["foo"], "bar");
        assert!(req.is_method("post"));
    }

    #[test]
    fn test_invalid_json_is_bad_request() {
        let req = Request {
            body: Some("{not json".to_string()),
            ..Default::default()
        };

        let err = req.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_default_is_get_root() {
        let req = Request::default();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/");
        assert!(req.body.is_none());
        assert!(req.query_param("q").is_none());
    }
}
