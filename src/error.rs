//! Application error taxonomy and its HTTP mapping.
//!
//! Validation, not-found and permission failures are reported to the caller
//! as structured JSON; storage-layer failures surface as a generic 500 with
//! the detail logged server-side only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::ai::AssistantError;

/// One failed field in a validation pass.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("draft is missing a project or recipient")]
    IncompleteDraft,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Permission(&'static str),

    #[error("missing or invalid user identity")]
    Unauthenticated,

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation failed", "fields": fields }),
            ),
            AppError::IncompleteDraft => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Please select both project and recipient before sending." }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            AppError::Permission(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "missing or invalid user identity" }),
            ),
            AppError::Assistant(err) => {
                let status = match err {
                    AssistantError::EmptyPrompt | AssistantError::NotConfigured => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, json!({ "error": err.to_string() }))
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = AppError::invalid("subject", "This field is required.").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("draft").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn assistant_empty_prompt_maps_to_400() {
        let resp = AppError::Assistant(AssistantError::EmptyPrompt).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn assistant_provider_failure_maps_to_500() {
        let resp =
            AppError::Assistant(AssistantError::Generation("quota exhausted".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
