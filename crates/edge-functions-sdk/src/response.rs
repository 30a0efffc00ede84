//! HTTP Response representation for handlers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an outgoing HTTP response.
///
/// # Quick Reference
///
/// | Method | Status | Use Case |
/// |--------|--------|----------|
/// | `ok(body)` | 200 | Successful response with a JSON body |
/// | `json(status, body)` | any | JSON body with a custom status |
/// | `text(status, body)` | any | Plain text body |
/// | `internal_error(msg)` | 500 | Handler or runtime failure |
/// | `service_unavailable(msg)` | 503 | Function cannot take requests |
/// | `gateway_timeout(msg)` | 504 | Function did not answer in time |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<String>,
}

impl Response {
    /// Create a new response with the given status code (no body).
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a 200 OK response with JSON body.
    ///
    /// # Example
    /// ```ignore
    /// Response::ok(json!({"message": "Success"}))
    /// Response::ok(my_struct) // If my_struct implements Serialize
    /// ```
    pub fn ok<T: Serialize>(body: T) -> Self {
        Self::json(200, body)
    }

    /// Create a JSON response with a custom status code.
    ///
    /// Sets `Content-Type: application/json`. A body that fails to serialize
    /// leaves the response without a body.
    pub fn json<T: Serialize>(status: u16, body: T) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_optional_body(serde_json::to_string(&body).ok())
    }

    /// Create a plain text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// Create a 500 Internal Server Error response.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::json(500, serde_json::json!({"error": message.into()}))
    }

    /// Create a 503 Service Unavailable response.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::json(503, serde_json::json!({"error": message.into()}))
    }

    /// Create a 504 Gateway Timeout response.
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::json(504, serde_json::json!({"error": message.into()}))
    }

    /// Add a header to the response (builder pattern).
    ///
    /// # Example
    /// ```ignore
    /// Response::ok(json!({"data": "value"}))
    ///     .with_header("Cache-Control", "max-age=3600")
    /// ```
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn with_optional_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}
