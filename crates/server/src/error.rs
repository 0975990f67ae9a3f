use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_core::{ChessError, MoveError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<ChessError> for AppError {
    fn from(e: ChessError) -> Self {
        AppError::Move(MoveError::Position(e))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Move(MoveError::Position(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Move(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Sqlx(_) | AppError::Json(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Unauthorized => "Not authenticated".to_string(),
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Move(MoveError::Position(e)) => {
                tracing::error!("Corrupt match state: {e}");
                "Internal server error".to_string()
            }
            AppError::Move(e) => e.to_string(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                msg.clone()
            }
            AppError::Sqlx(e) => {
                tracing::error!("Database error: {e}");
                "Database error".to_string()
            }
            AppError::Json(e) => {
                tracing::error!("Stored game state is not valid JSON: {e}");
                "Internal server error".to_string()
            }
            AppError::Anyhow(e) => {
                tracing::error!("Unexpected error: {e}");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
