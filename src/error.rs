use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid export document: {0}")]
    InvalidDocument(String),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("Batch not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Normalize(NormalizeError::Io { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Normalize(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
