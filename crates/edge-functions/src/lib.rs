//! Edge function host
//!
//! Accepts HTTP connections, converts each request into an SDK
//! [`Request`](edge_functions_sdk::Request), invokes the configured function
//! and writes its [`Response`](edge_functions_sdk::Response) back.

pub mod config;
pub mod router;
pub mod runtime;

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::runtime::HandlerRegistry;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub handler_registry: HandlerRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, handler_registry: HandlerRegistry) -> Self {
        Self {
            config,
            handler_registry,
        }
    }
}

/// Build the full HTTP application
pub fn app(state: Arc<AppState>) -> Router {
    router::create_function_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound, not yet running, server
pub struct Application {
    listener: TcpListener,
    router: Router,
    state: Arc<AppState>,
    address: SocketAddr,
}

impl Application {
    /// Bind the configured address. Port 0 picks an ephemeral port.
    pub async fn build(state: Arc<AppState>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(state.config.bind_addr()).await?;
        let address = listener.local_addr()?;

        Ok(Self {
            listener,
            router: app(state.clone()),
            state,
            address,
        })
    }

    /// Address the listener is actually bound to
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then let in-flight requests finish
    pub async fn run_until<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(function = %self.state.config.function, "Listening on {}", self.address);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        let stats = self.state.handler_registry.stats().await;
        tracing::info!(
            loaded = stats.loaded_count,
            active = stats.active_requests,
            "Server stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install ctrl-c handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received ctrl-c"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
