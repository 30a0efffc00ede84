//! Handler trait and adapters
//!
//! Functions are linked into the hosting runtime and registered by name.
//! Anything implementing [`Handler`] can be registered; plain async functions
//! are wrapped with [`handler_fn`].
//!
//! # Example
//!
//! ```ignore
//! use edge_functions_sdk::prelude::*;
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::ok(json!({"message": "Hello!"}))
//! }
//!
//! let handler = handler_fn("hello", hello);
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::{Request, Response};

/// Type alias for boxed future returned by handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A function the runtime can invoke once per incoming request.
///
/// Invocations must be independent: the runtime may run any number of them
/// concurrently on different tasks.
pub trait Handler: Send + Sync + 'static {
    /// Name the function is registered and dispatched under
    fn name(&self) -> &str;

    /// Handle a single request
    fn call(&self, req: Request) -> BoxFuture<'static, Response>;
}

/// [`Handler`] backed by an async function or closure
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, req: Request) -> BoxFuture<'static, Response> {
        Box::pin((self.f)(req))
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

/// Wrap an async function as a named [`Handler`]
pub fn handler_fn<F, Fut>(name: impl Into<String>, f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    FnHandler { name: name.into(), f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_handler_fn_invokes_closure() {
        let handler = handler_fn("echo_path", |req: Request| async move {
            Response::ok(json!({"path": req.path}))
        });

        assert_eq!(handler.name(), "echo_path");

        let req = Request {
            path: "/items".to_string(),
            ..Default::default()
        };
        let response = handler.call(req).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body.as_deref(), Some(r#"{"path":"/items"}"#));
    }

    #[tokio::test]
    async fn test_handler_usable_as_trait_object() {
        async fn teapot(_req: Request) -> Response {
            Response::text(418, "short and stout")
        }

        let handler: Box<dyn Handler> = Box::new(handler_fn("teapot", teapot));
        let response = handler.call(Request::default()).await;
        assert_eq!(response.status, 418);
    }
}
