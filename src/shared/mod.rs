//! Shared Module
//!
//! Types that carry no dependency on the HTTP runtime: the application
//! configuration and the validation error types used when checking request
//! bodies.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Request body validation rules
pub mod validation;

/// Re-export commonly used types for convenience
pub use error::{FieldError, SharedError};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use validation::Validate;
