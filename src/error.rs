//! Typed errors and HTTP mapping.

use crate::model::ValidationErrors;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Diagnostic text longer than this is cut before it reaches a client.
const MAX_DIAGNOSTIC_LEN: usize = 80;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::NotFound(_) => "not_found",
            AppError::Store(_) => "store_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Cut `message` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_diagnostic(message: &str, max: usize) -> String {
    match message.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }
        let details = match &self {
            AppError::Validation(errors) => serde_json::to_value(&errors.0).ok(),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: truncate_diagnostic(&self.to_string(), MAX_DIAGNOSTIC_LEN),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldError;

    #[test]
    fn statuses_follow_error_kind() {
        let validation = AppError::Validation(ValidationErrors(vec![FieldError::new("request", "field required")]));
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::NotFound("/x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::StoreUnavailable("DATABASE_URL not set".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Internal("bad doc".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn long_diagnostics_are_truncated() {
        let long = "x".repeat(200);
        let cut = truncate_diagnostic(&long, 10);
        assert_eq!(cut, format!("{}...", "x".repeat(10)));
        assert_eq!(truncate_diagnostic("short", 10), "short");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let cut = truncate_diagnostic("ééééé", 2);
        assert_eq!(cut, "éé...");
    }
}
