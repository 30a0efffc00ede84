use edge_functions_sdk::prelude::*;

pub const GREETING: &str = "Hello from the handle_signup function!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupGreeting {
    pub message: String,
}

impl Default for SignupGreeting {
    fn default() -> Self {
        Self {
            message: GREETING.to_string(),
        }
    }
}

/// Answers every request with the fixed greeting.
///
/// Method, path, headers, query and body are ignored.
pub async fn handle(_req: Request) -> Response {
    Response::ok(SignupGreeting::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const EXPECTED_BODY: &str = r#"{"message":"Hello from the handle_signup function!"}"#;

    #[tokio::test]
    async fn test_get_root() {
        let response = handle(Request::default()).await;

        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(response.body.as_deref(), Some(EXPECTED_BODY));
    }

    #[tokio::test]
    async fn test_body_is_ignored() {
        let req = Request {
            method: "POST".to_string(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: Some(r#"{"foo":"bar"}"#.to_string()),
            ..Default::default()
        };

        let response = handle(req).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body.as_deref(), Some(EXPECTED_BODY));
    }

    #[tokio::test]
    async fn test_any_method_and_path() {
        for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"] {
            let req = Request {
                method: method.to_string(),
                path: "/functions/v1/handle_signup".to_string(),
                query: HashMap::from([("ref".to_string(), "abc".to_string())]),
                ..Default::default()
            };

            let response = handle(req).await;
            assert_eq!(response.status, 200, "method {}", method);
            assert_eq!(response.body.as_deref(), Some(EXPECTED_BODY));
        }
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let first = handle(Request::default()).await;
        let second = handle(Request::default()).await;

        assert_eq!(first, second);

        let greeting: SignupGreeting = serde_json::from_str(first.body.as_deref().unwrap()).unwrap();
        assert_eq!(greeting, SignupGreeting::default());
    }

    #[tokio::test]
    async fn test_registered_handler() {
        let handler = crate::handler();
        assert_eq!(handler.name(), "handle_signup");

        let response = handler.call(Request::default()).await;
        assert_eq!(response.body.as_deref(), Some(EXPECTED_BODY));
    }
}
