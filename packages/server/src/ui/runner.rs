//! Router assembly and server entry point.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::ServerError;

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the axum router for the given state.
///
/// Anything that is not the WebSocket endpoint or the API falls through to
/// static assets under `public/`, when a deployment provides that directory.
/// No bundle ships with the server, so the fallback answers 404 otherwise.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until a shutdown signal arrives.
pub async fn run(port: u16) -> Result<(), ServerError> {
    let state = AppState::new();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Piazza chat server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
