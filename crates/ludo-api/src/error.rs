//! Ludo room server: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ludo_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is set to an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Tracing or span exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::RoomNotFound(_) => (StatusCode::NOT_FOUND, "room_not_found"),
            DomainError::RoomFull(_) => (StatusCode::CONFLICT, "room_full"),
            DomainError::AlreadyInRoom(_) => (StatusCode::CONFLICT, "already_in_room"),
            DomainError::NotYourTurn => (StatusCode::BAD_REQUEST, "not_your_turn"),
            DomainError::InvalidMove => (StatusCode::BAD_REQUEST, "invalid_move"),
            DomainError::GameNotStarted(_) => (StatusCode::BAD_REQUEST, "game_not_started"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
