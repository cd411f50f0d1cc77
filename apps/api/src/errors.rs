use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::engine::LayoutConfigError;
use crate::scripture::ScriptureError;
use crate::slides::{SlideOrderError, SlideTextError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LayoutConfigError> for AppError {
    fn from(e: LayoutConfigError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<SlideOrderError> for AppError {
    fn from(e: SlideOrderError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<SlideTextError> for AppError {
    fn from(e: SlideTextError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ScriptureError> for AppError {
    fn from(e: ScriptureError) -> Self {
        match e {
            ScriptureError::InvalidReference(msg) => AppError::Validation(msg),
            ScriptureError::NotFound(reference) => {
                AppError::NotFound(format!("No verses for {reference}"))
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The verse service could not be reached".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
