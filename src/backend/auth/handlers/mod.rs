//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for the `/auth` endpoints.
//! Handlers are thin: they validate the body, call `auth::service` and turn
//! the outcome into cookies and JSON.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs           - Module exports and documentation
//! ├── types.rs         - Request and response types
//! ├── extract.rs       - ValidJson extractor, User-Agent helper
//! ├── register.rs      - POST /auth/register
//! ├── login.rs         - POST /auth/login
//! ├── google.rs        - POST /auth/login/google
//! ├── session.rs       - POST /auth/logout, GET /auth/refresh
//! └── verification.rs  - email verification, forgot/reset password
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use warden::backend::auth::handlers::{login, register};
//! use warden::backend::AppState;
//! use axum::{routing::post, Router};
//!
//! let router: Router<AppState> = Router::new()
//!     .route("/auth/register", post(register))
//!     .route("/auth/login", post(login));
//! ```

/// Request and response types
pub mod types;

/// Body and header extraction
pub mod extract;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Google login handler
pub mod google;

/// Logout and refresh handlers
pub mod session;

/// Email verification and password reset handlers
pub mod verification;

// Re-export handlers
pub use google::google_login;
pub use login::login;
pub use register::register;
pub use session::{logout, refresh};
pub use verification::{forgot_password, reset_password, verify_email};
