//! Error types for the redemption API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfmate_license::{ErrorBody, RedemptionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Redemption(#[from] RedemptionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ApiError::Redemption(RedemptionError::NotFound) => {
                (StatusCode::NOT_FOUND, RedemptionError::NotFound.to_string())
            }
            ApiError::Redemption(RedemptionError::Conflict) => {
                (StatusCode::CONFLICT, RedemptionError::Conflict.to_string())
            }
            ApiError::Redemption(RedemptionError::Internal(e)) => {
                tracing::error!("Redemption failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process activation request.".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
