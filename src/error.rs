use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Plex error: {0}")]
    Plex(String),

    #[error("Last.fm error: {0}")]
    LastFm(String),

    #[error("Playlist store error: {0}")]
    PlaylistStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::PlaylistStore(msg) => (StatusCode::CONFLICT, msg),
            AppError::Plex(msg) | AppError::LastFm(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Config(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to write output file".to_string())
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
