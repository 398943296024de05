//! Backend Module
//!
//! All server-side code: the Axum application, the auth flows behind it and
//! the SQLite persistence they use.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Application state, database setup, app creation
//! - **`routes`** - Router assembly and route tables
//! - **`auth`** - Users, sessions, tokens, Google login and the auth handlers
//! - **`account`** - Endpoints for the logged-in user
//! - **`email`** - Outgoing verification and reset emails
//! - **`middleware`** - The `authenticate` layer and `AuthUser` extractor
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── account/        - Current user and session management
//! ├── email/          - Email delivery and templates
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`; the error converts itself into
//! a JSON response with the right status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Endpoints for the authenticated user
pub mod account;

/// Outgoing email
pub mod email;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState};
