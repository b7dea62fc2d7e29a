//! API Gateway error types and their HTTP status mapping.
//!
//! Every decode, compute or encode failure becomes an explicit response;
//! nothing is retried server-side.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use mr_01_bloom_filter::FilterError;
use mr_03_reconciliation::ReconcileError;
use serde::Serialize;

/// Request-level error, one variant per outcome class
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body (client fault)
    #[error("decode error: {0}")]
    Decode(String),

    /// Bad hex encoding or invalid filter parameters (client fault)
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Deadline exceeded or request cancelled
    #[error("request timed out")]
    Timeout,

    /// Response serialization failed (server fault)
    #[error("encode error: {0}")]
    Encode(String),

    /// Computation failed or panicked (server fault)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) | ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Encode(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable classification
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Decode(_) => "decode_error",
            ApiError::InvalidFilter(_) => "invalid_filter",
            ApiError::Timeout => "timeout",
            ApiError::Encode(_) => "encode_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// Whether the client caused the failure
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error() && !matches!(self, ApiError::Timeout)
    }
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Timeouts carry no body
        if matches!(self, ApiError::Timeout) {
            return status.into_response();
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        match serde_json::to_vec(&body) {
            Ok(bytes) => (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                bytes,
            )
                .into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}

// Conversions from common error types

impl From<hex::FromHexError> for ApiError {
    fn from(e: hex::FromHexError) -> Self {
        ApiError::InvalidFilter(format!("invalid hex: {}", e))
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        ApiError::InvalidFilter(e.to_string())
    }
}

impl From<ReconcileError> for ApiError {
    fn from(e: ReconcileError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, not per request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server loop failed
    #[error("server error: {0}")]
    Serve(String),
}
