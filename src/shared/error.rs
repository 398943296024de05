//! Shared Error Types
//!
//! Errors that describe a bad request body independently of the HTTP layer.
//! The backend converts them into `400 Bad Request` responses.
//!
//! # Usage
//!
//! ```rust
//! use warden::shared::error::{FieldError, SharedError};
//!
//! let error = SharedError::fields(vec![FieldError::new("email", "Invalid email address")]);
//! assert!(error.to_string().contains("email"));
//! ```
use serde::Serialize;
use thiserror::Error;

/// A single failed field check, reported back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears in the request body
    pub path: String,
    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Shared error types
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// One or more request fields failed validation
    #[error("Validation error: {}", describe(.errors))]
    ValidationError {
        /// Every failing field, in declaration order
        errors: Vec<FieldError>,
    },
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SharedError {
    /// Create a validation error from a list of field errors
    pub fn fields(errors: Vec<FieldError>) -> Self {
        Self::ValidationError { errors }
    }
}
