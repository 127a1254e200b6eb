//! Error handling for the proxy.
//!
//! Every failure in the crate is an [`AppError`]. Each variant knows its HTTP
//! status and renders as the `{ "error": ..., "details": ... }` body the
//! fiction-writing frontend expects.

pub mod types;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body returned to HTTP callers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String, line: Option<usize> },

    /// The key pool is empty, so no request can be served.
    #[error("GEMINI_API_KEY environment variables are not set on the server.")]
    NoUsableKeys,

    // Request errors
    #[error("{message}")]
    InvalidRequest { message: String },

    // Upstream errors
    /// Upstream rejected the request itself; another key would not help.
    #[error("Gemini API call failed with status {status}")]
    UpstreamFatal { status: u16, details: Value },

    /// Every key was tried. Carries the last failure only.
    #[error("All available Gemini API keys failed.")]
    UpstreamExhausted { status: u16, details: Value },

    #[error("HTTP client error: {message}")]
    HttpClient { message: String, status_code: Option<u16> },

    // System errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO operation failed: {operation} - {message}")]
    Io { operation: String, message: String },
}

impl AppError {
    /// Create a new configuration validation error
    pub fn config_validation(message: impl Into<String>, field: Option<impl Into<String>>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            field: field.map(Into::into),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } | Self::ConfigParse { .. } | Self::Serialization { .. } => {
                StatusCode::BAD_REQUEST
            }

            Self::ConfigNotFound { .. } => StatusCode::NOT_FOUND,

            // Upstream statuses pass through; anything unrepresentable becomes 500.
            Self::UpstreamFatal { status, .. } | Self::UpstreamExhausted { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }

            Self::HttpClient { .. } => StatusCode::BAD_GATEWAY,

            Self::ConfigValidation { .. }
            | Self::NoUsableKeys
            | Self::Internal { .. }
            | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Upstream diagnostic body, if this error carries one.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::UpstreamFatal { details, .. } | Self::UpstreamExhausted { details, .. } => {
                Some(details)
            }
            _ => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                error = %self,
                http.status_code = status.as_u16(),
                details = ?self.details(),
                "Application error occurred"
            );
        } else {
            warn!(
                error = %self,
                http.status_code = status.as_u16(),
                details = ?self.details(),
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details().cloned(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
