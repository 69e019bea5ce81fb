//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::RoomSummaryDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List live rooms with their member counts.
///
/// Empty rooms never appear here: a room entry is deleted the moment its
/// last member disconnects.
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.registry.list_rooms().await;
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}
