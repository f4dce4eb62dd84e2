//! HTTP server assembly and lifecycle

use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, AppState};
use crate::config::WayfarerConfig;

/// Assemble the full application router with its middleware stack.
/// Split from [`run`] so tests can drive the router without a socket.
pub fn app(config: &WayfarerConfig, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_kb * 1024))
}

/// Bind and serve until the process is stopped
pub async fn run(config: &WayfarerConfig, state: AppState) -> Result<()> {
    let router = app(config, state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("API server running at http://{}", addr);
    axum::serve(listener, router)
        .await
        .context("Server terminated unexpectedly")?;
    Ok(())
}
