//! Read-only routes over the room registry.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use ludo_core::identity::RoomId;
use ludo_rooms::application::query_handlers;
use ludo_rooms::domain::aggregates::{RoomSnapshot, RoomSummary};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomSummary>>, ApiError> {
    let registry = state.lock_registry()?;
    Ok(Json(query_handlers::list_rooms(&registry)))
}

/// GET /{room_id}
#[instrument(skip(state))]
async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSnapshot>, ApiError> {
    let registry = state.lock_registry()?;
    let snapshot = query_handlers::get_room_by_id(&RoomId::from(room_id), &registry)?;
    Ok(Json(snapshot))
}

/// Returns the router for room queries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms))
        .route("/{room_id}", get(get_room))
}
