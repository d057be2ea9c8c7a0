//! Error types for flashpoll.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Option not found in poll: {0}")]
    InvalidOption(String),

    #[error("Invalid reaction type: {0}")]
    InvalidType(String),

    // === Server Errors ===
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A server-side failure tagged with the user-facing action that failed.
    #[error("{action}")]
    Failed {
        action: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_)
            | Self::Validation(_)
            | Self::InvalidId(_)
            | Self::InvalidOption(_)
            | Self::InvalidType(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Connection(_) | Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            Self::Failed { source, .. } => source.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::InvalidOption(_) => "INVALID_OPTION",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Failed { source, .. } => source.error_code(),
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Full description including any wrapped cause. Never sent to clients.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Failed { action, source } => format!("{action}: {}", source.detail()),
            other => other.to_string(),
        }
    }

    /// Message safe to expose in a response body.
    fn public_message(&self) -> String {
        match self {
            Self::Failed { action, .. } => (*action).to_string(),
            e if e.is_server_error() => "Internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

/// Attaches a user-facing action to server-side failures.
pub trait AppResultExt<T> {
    /// Wraps a server error as `Failed { action, .. }` so the response reads
    /// e.g. "Failed to submit vote". Client errors pass through untouched.
    fn context_action(self, action: &'static str) -> AppResult<T>;
}

impl<T> AppResultExt<T> for AppResult<T> {
    fn context_action(self, action: &'static str) -> AppResult<T> {
        self.map_err(|err| {
            if err.is_server_error() {
                AppError::Failed {
                    action,
                    source: Box::new(err),
                }
            } else {
                err
            }
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self.detail(), code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
