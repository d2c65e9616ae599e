//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Live rooms.
    pub rooms: usize,
    /// Open WebSocket connections.
    pub connections: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let rooms = state.lock_registry()?.len();
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        rooms,
        connections: state.hub.connection_count(),
    }))
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
