//! Shared JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;

/// Body of every failed request: `{"success": false, "error": ..., "code": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.to_string(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(ErrorCode::SessionNotFound, error)
    }

    /// Pairs the body with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
