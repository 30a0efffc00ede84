//! Handler registry
//!
//! Holds the functions linked into this binary, keyed by name, and runs
//! invocations on their own tasks so a slow or panicking function cannot take
//! the connection task down with it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use edge_functions_sdk::{Handler, Request, Response};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by the runtime while invoking a function
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("Handler not loaded: {0}")]
    NotLoaded(String),

    #[error("Handler execution timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Handler task panicked: {0}")]
    Panicked(String),
}

/// A registered handler plus its in-flight bookkeeping
struct LoadedHandler {
    handler: Box<dyn Handler>,

    /// Active request count
    active_requests: AtomicU64,
}

/// Guard that decrements active request count when dropped
struct RequestGuard {
    handler: Arc<LoadedHandler>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.handler.active_requests.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LoadedHandler {
    fn new(handler: impl Handler) -> Self {
        Self {
            handler: Box::new(handler),
            active_requests: AtomicU64::new(0),
        }
    }

    fn name(&self) -> &str {
        self.handler.name()
    }

    /// Increment active request count and return a guard
    fn acquire_request(self: &Arc<Self>) -> RequestGuard {
        self.active_requests.fetch_add(1, Ordering::SeqCst);
        RequestGuard { handler: Arc::clone(self) }
    }

    /// Get the number of active requests
    fn active_request_count(&self) -> u64 {
        self.active_requests.load(Ordering::SeqCst)
    }
}

/// Registry for linked-in handlers
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<LoadedHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name. Returns true if it replaced one.
    pub async fn register(&self, handler: impl Handler) -> bool {
        let loaded = Arc::new(LoadedHandler::new(handler));
        let name = loaded.name().to_string();

        let mut handlers = self.handlers.write().await;
        let replaced = handlers.insert(name.clone(), loaded).is_some();

        tracing::info!(function = %name, replaced, "Registered handler");
        replaced
    }

    /// Remove a handler. In-flight invocations keep their own reference.
    pub async fn unregister(&self, name: &str) -> bool {
        let mut handlers = self.handlers.write().await;
        let removed = handlers.remove(name).is_some();

        if removed {
            tracing::info!(function = %name, "Unregistered handler");
        }
        removed
    }

    async fn get(&self, name: &str) -> Option<Arc<LoadedHandler>> {
        let handlers = self.handlers.read().await;
        handlers.get(name).cloned()
    }

    /// Check if a handler is registered
    pub async fn is_loaded(&self, name: &str) -> bool {
        let handlers = self.handlers.read().await;
        handlers.contains_key(name)
    }

    /// List registered handler names, sorted
    pub async fn list(&self) -> Vec<String> {
        let handlers = self.handlers.read().await;
        let mut names: Vec<String> = handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get handler count
    pub async fn count(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers.len()
    }

    /// Execute a handler with timeout and request tracking
    pub async fn execute_with_timeout(
        &self,
        name: &str,
        req: Request,
        timeout: Duration,
    ) -> Result<Response, ExecuteError> {
        let handler = self.get(name).await
            .ok_or_else(|| ExecuteError::NotLoaded(name.to_string()))?;

        let guard = handler.acquire_request();
        let future = handler.handler.call(req);

        // The guard moves into the task so the count only drops once the
        // invocation has actually finished or been aborted.
        let mut task = tokio::spawn(async move {
            let _guard = guard;
            future.await
        });

        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(ExecuteError::Panicked(e.to_string())),
            Err(_) => {
                task.abort();
                Err(ExecuteError::TimedOut(timeout))
            }
        }
    }

    /// Get handler stats
    pub async fn stats(&self) -> HandlerStats {
        let handlers = self.handlers.read().await;

        HandlerStats {
            loaded_count: handlers.len(),
            active_requests: handlers.values().map(|h| h.active_request_count()).sum(),
        }
    }
}

/// Statistics about registered handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerStats {
    /// Number of registered handlers
    pub loaded_count: usize,
    /// Total active requests across all handlers
    pub active_requests: u64,
}
