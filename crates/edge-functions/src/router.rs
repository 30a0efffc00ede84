//! Function router - turns every HTTP request into a function invocation
//!
//! There are no reserved paths: `/` and everything below it belong to the
//! configured function.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use http_body_util::LengthLimitError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::runtime::ExecuteError;
use crate::AppState;

/// Create the router that hands all incoming requests to the function
pub fn create_function_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{*path}", any(handle_function_request))
        .route("/", any(handle_function_request))
}

/// Handle an incoming request by invoking the configured function
async fn handle_function_request(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let function = state.config.function.as_str();

    tracing::debug!(
        request_id = %request_id,
        function = %function,
        method = %request.method(),
        path = %request.uri().path(),
        "Incoming request"
    );

    let sdk_request = match build_sdk_request(request, request_id.clone(), state.config.max_body_bytes).await {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(request_id = %request_id, "Failed to read body: {}", e);
            return into_http_response(edge_functions_sdk::Response::json(
                400,
                serde_json::json!({"error": "Failed to read body"}),
            ));
        }
    };

    let timeout = Duration::from_secs(state.config.handler_timeout_secs);
    let result = state.handler_registry
        .execute_with_timeout(function, sdk_request, timeout)
        .await;

    match result {
        Ok(sdk_response) => into_http_response(sdk_response),
        Err(e) => {
            tracing::error!(request_id = %request_id, function = %function, "Handler error: {}", e);
            into_http_response(error_response(&e))
        }
    }
}

/// Convert an axum request into the SDK representation handed to functions
async fn build_sdk_request(
    request: Request<Body>,
    request_id: String,
    max_body_bytes: usize,
) -> Result<edge_functions_sdk::Request, axum::Error> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let query: HashMap<String, String> = request.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let client_ip = forwarded_client_ip(request.headers());

    let headers = collect_headers(request.headers());

    // An oversized body is dropped; the function still runs.
    let body = match axum::body::to_bytes(request.into_body(), max_body_bytes).await {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).to_string()),
        Err(e) if is_length_limit(&e) => {
            tracing::warn!(request_id = %request_id, max_body_bytes, "Request body over limit, dropping it");
            None
        }
        Err(e) => return Err(e),
    };

    Ok(edge_functions_sdk::Request {
        method,
        path,
        query,
        headers,
        body,
        client_ip,
        request_id,
    })
}

/// Header map keyed by lowercase name. Repeated headers are joined with
/// `", "` and non-ASCII values are decoded lossily.
fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match collected.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    collected
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// First address in `X-Forwarded-For`, if any
fn forwarded_client_ip(headers: &HeaderMap) -> Option<String> {
    headers.get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

fn error_response(err: &ExecuteError) -> edge_functions_sdk::Response {
    match err {
        ExecuteError::NotLoaded(_) => edge_functions_sdk::Response::json(
            404,
            serde_json::json!({"error": err.to_string()}),
        ),
        ExecuteError::TimedOut(_) => edge_functions_sdk::Response::gateway_timeout(err.to_string()),
        ExecuteError::Panicked(_) => edge_functions_sdk::Response::internal_error("Handler failed"),
    }
}

/// Convert an SDK response into an HTTP response
fn into_http_response(sdk_response: edge_functions_sdk::Response) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(sdk_response.status).unwrap_or(StatusCode::OK));

    for (key, value) in &sdk_response.headers {
        builder = builder.header(key, value);
    }

    match builder.body(Body::from(sdk_response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}
