//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pallanguzhi_core::GameError;
use serde_json::json;

/// Error body returned by every failing endpoint: `{ "error": message }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn no_game() -> Self {
        Self::new(StatusCode::CONFLICT, "no game in progress")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match err {
            GameError::InvalidMove(_) | GameError::EndlessRelay { .. } | GameError::InvalidConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            GameError::NotYourTurn(_)
            | GameError::GameOver
            | GameError::NoLegalMove(_)
            | GameError::StaleSearch => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!("Request failed: {}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
