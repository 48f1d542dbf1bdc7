//! Memories Store Server
//!
//! HTTP surface for the memory engine: one tool-style endpoint that takes a
//! JSON request and replies with the engine's string verbatim.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memories_store::{Config, MemoryRequest, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::default();
    tracing::info!("Starting Memories Store Server on port {}", config.server_port);
    tracing::info!("Database: {:?}", config.db_path);

    let store = Arc::new(MemoryStore::new(config.clone())?);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/execute", post(execute))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(store);

    let listener =
        tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.server_port)).await?;
    tracing::info!("Server listening on http://127.0.0.1:{}", config.server_port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

/// The single tool entry point. Errors are reported in the body, never as
/// HTTP status codes, matching the tool contract of one string per call.
async fn execute(
    State(store): State<Arc<MemoryStore>>,
    Json(request): Json<MemoryRequest>,
) -> String {
    store.execute(request)
}
