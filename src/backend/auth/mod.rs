//! Authentication Module
//!
//! This module handles registration, login (password and Google), sessions,
//! token refresh, email verification and password reset.
//!
//! # Architecture
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - Session records backing every login
//! - **`verification`** - One-shot codes for email verification and resets
//! - **`tokens`** - Access/refresh JWT signing and verification
//! - **`password`** - bcrypt hashing
//! - **`google`** - Google ID token verification
//! - **`cookies`** - Setting and clearing the auth cookies
//! - **`service`** - The auth flows
//! - **`handlers`** - HTTP handlers for the `/auth` endpoints
//!
//! # Authentication Flow
//!
//! 1. **Register / Login**: credentials checked → session row created →
//!    access token (15 min) and refresh token (30 days) set as cookies
//! 2. **Authenticated requests**: the `authenticate` middleware checks the
//!    access token and that its session still exists
//! 3. **Refresh**: the refresh token cookie buys a new access token; sessions
//!    near expiry are extended and the refresh token rotated
//! 4. **Logout / password reset**: session rows deleted, cookies cleared

/// User data model and database operations
pub mod users;

/// Session records
pub mod sessions;

/// Verification and reset codes
pub mod verification;

/// JWT access and refresh tokens
pub mod tokens;

/// Password hashing
pub mod password;

/// Google ID token verification
pub mod google;

/// Auth cookie helpers
pub mod cookies;

/// Authentication flows
pub mod service;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types
pub use handlers::types::{LoginRequest, RegisterRequest, UserResponse};
pub use tokens::{TokenError, TokenService};
pub use users::{AuthProvider, User};
