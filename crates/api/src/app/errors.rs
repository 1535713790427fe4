//! The single place failures become HTTP responses.
//!
//! Handlers return `Result<_, ApiError>` and never build error bodies
//! themselves. Unexpected failures are logged for operators and rendered
//! as an opaque 500; internal detail never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use ripple_core::{DomainError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error(transparent)]
    Validation(ValidationError),

    #[error("unexpected: {detail}")]
    Unexpected { detail: String },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, .. } => Self::NotFound {
                message: format!("{entity} not found"),
            },
            DomainError::Validation(v) => Self::Validation(v),
            DomainError::Store(detail) => Self::Unexpected { detail },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound { message } => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Validation error",
                    "errors": err.issues,
                })),
            )
                .into_response(),
            ApiError::Unexpected { detail } => {
                tracing::error!(detail = %detail, "unexpected error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "An unexpected error occurred" })),
                )
                    .into_response()
            }
        }
    }
}
