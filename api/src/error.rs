//! Unified error types for the Petstore API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Classified persistence and business-rule failures
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//! - `ApiResponse`: The fixed `code`/`type`/`message` document sent on the wire

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain layer errors
///
/// The storage adapter is the only place store failures get classified into
/// these variants. Services pass them upward unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store operation timed out: {0}")]
    Timeout(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Numeric code carried in the error document (aligned with HTTP status codes)
    pub fn code(&self) -> u16 {
        match self {
            DomainError::NotFound(_) => 404,
            DomainError::Conflict(_) => 409,
            DomainError::InvalidArgument(_) => 400,
            DomainError::Unauthorized(_) => 401,
            DomainError::Timeout(_) => 504,
            DomainError::Unavailable(_) => 503,
            DomainError::Database(_) | DomainError::Internal(_) => 500,
        }
    }

    /// Type tag carried in the error document
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::InvalidArgument(_) => "invalid_argument",
            DomainError::Unauthorized(_) => "unauthorized",
            DomainError::Timeout(_) => "timeout",
            DomainError::Unavailable(_) => "unavailable",
            DomainError::Database(_) => "database",
            DomainError::Internal(_) => "internal",
        }
    }

    /// Whether the failure originates from the store rather than the caller
    pub fn is_server_side(&self) -> bool {
        self.code() >= 500
    }
}

/// Structured response document: `{"code": .., "type": .., "message": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ApiResponse {
    pub fn new(code: i32, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<&DomainError> for ApiResponse {
    fn from(e: &DomainError) -> Self {
        ApiResponse::new(i32::from(e.code()), e.kind(), e.to_string())
    }
}

impl std::fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{} {}: {}", self.code, self.kind, self.message),
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Request too large: {0}")]
    PayloadTooLarge(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Domain(e) => {
                if e.is_server_side() {
                    tracing::error!(error = %e, "Store failure");
                }
                let status =
                    StatusCode::from_u16(e.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, ApiResponse::from(e))
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::new(400, "bad_request", msg.clone()),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiResponse::new(413, "payload_too_large", msg.clone()),
            ),
        };

        (status, Json(body)).into_response()
    }
}
