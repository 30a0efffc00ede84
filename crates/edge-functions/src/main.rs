//! Edge Functions - Main entry point
//!
//! Serves the linked-in functions over HTTP until interrupted.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_functions::config::AppConfig;
use edge_functions::runtime::HandlerRegistry;
use edge_functions::{AppState, Application};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,edge_functions=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Edge Functions");

    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let handler_registry = HandlerRegistry::new();
    handler_registry.register(handle_signup::handler()).await;

    if !handler_registry.is_loaded(&config.function).await {
        tracing::warn!(
            function = %config.function,
            available = ?handler_registry.list().await,
            "Configured function is not registered, requests will get 404"
        );
    }

    let state = Arc::new(AppState::new(config, handler_registry));
    let bind_addr = state.config.bind_addr();

    let app = Application::build(state)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    app.run().await.context("Server error")?;

    Ok(())
}
