use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Transport-level failure talking to the metadata service
    #[error("Metadata service unreachable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Availability dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(e) => {
                // Transport details stay in the logs, never in the response
                tracing::error!(error = %e.without_url(), "Metadata service request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Metadata service unreachable".to_string(),
                )
            }
            AppError::Dataset(_) | AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
