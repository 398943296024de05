/**
 * Backend Error Types
 *
 * This module defines the error type returned by every handler and service
 * function. Expected failures (bad credentials, duplicate email, expired
 * session) carry their own status code and a user-facing message.
 * Infrastructure failures (database, hashing, token signing, upstream HTTP)
 * map to 5xx and never expose their details to the client.
 */

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::backend::email::MailError;
use crate::shared::{ConfigError, SharedError};

/// Machine-readable code attached to some errors so clients can react
/// without parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    /// The access token is missing, malformed, expired, or its session is gone.
    /// Clients respond by calling the refresh endpoint.
    InvalidAccessToken,
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use warden::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::CONFLICT, "Email already in use");
/// assert_eq!(err.status_code(), StatusCode::CONFLICT);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Expected failure with a status code and a message safe to show the user
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
        /// Optional machine-readable code
        code: Option<ErrorCode>,
    },

    /// Request body failed validation
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Invalid configuration at startup
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Outgoing email could not be delivered
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// A third-party service failed or was unreachable
    #[error("Upstream error: {message}")]
    Upstream {
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    /// Create a new handler error with a status code
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code
    /// * `message` - Error message shown to the client
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
            code: None,
        }
    }

    /// Create a handler error carrying an [`ErrorCode`]
    pub fn with_code(status: StatusCode, message: impl Into<String>, code: ErrorCode) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
            code: Some(code),
        }
    }

    /// Shorthand for `401 Unauthorized`
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// Shorthand for `404 Not Found`
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 Bad Request
    /// - `Upstream` - 502 Bad Gateway
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Config(_)
            | Self::Database(_)
            | Self::Migration(_)
            | Self::PasswordHash(_)
            | Self::Token(_)
            | Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message returned to the client
    ///
    /// Infrastructure errors collapse to a generic message.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(SharedError::ValidationError { .. }) => {
                "Validation failed".to_string()
            }
            Self::Upstream { message } => message.clone(),
            Self::Mail(_) => "Failed to send email".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Machine-readable code, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::HandlerError { code, .. } => *code,
            _ => None,
        }
    }
}

/// Fail with `status`/`message` unless `condition` holds.
pub fn ensure(
    condition: bool,
    status: StatusCode,
    message: impl Into<String>,
) -> Result<(), BackendError> {
    if condition {
        Ok(())
    } else {
        Err(BackendError::handler(status, message))
    }
}
