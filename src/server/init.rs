//! Server initialization and run loop

use super::loader::load_config;
use super::providers::{build_pipeline, resolve_comment_generator, resolve_executor};
use super::validation::validate_config;
use crate::api::{api_router, AppState};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Load configuration, wire components and serve until Ctrl-C
pub async fn run() -> Result<()> {
    let config = load_config()?;
    validate_config(&config)?;

    info!(
        daily_cap = config.admission.daily_cap,
        min_gap_ms = config.admission.min_gap_ms,
        max_gap_ms = config.admission.max_gap_ms,
        "Admission limits loaded"
    );

    let generator = resolve_comment_generator(&config.llm)?;
    let executor = resolve_executor(&config.executor)?;
    let pipeline = Arc::new(build_pipeline(&config, executor));

    let state = AppState {
        pipeline,
        generator,
    };

    let app = api_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Cadence shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
