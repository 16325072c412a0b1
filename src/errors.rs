// src/errors.rs

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    UnprocessableEntity(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream request failed: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::UpstreamUnavailable(message) => {
                tracing::error!("Upstream request failed: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable".to_string(),
                )
            }
            AppError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Multipart processing error: {:?}", err);
        AppError::UnprocessableEntity(format!("Form data could not be processed: {}", err))
    }
}
