//! Warden - Authentication Backend
//!
//! Warden is a session-based authentication server built on Axum and SQLx.
//! It handles account registration, local and Google login, access token
//! refresh, email verification and password reset.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the server runtime
//!   - Configuration and its builder
//!   - Validation errors
//!
//! - **`backend`** - The HTTP server
//!   - Axum router, handlers and middleware
//!   - User, session and verification code stores
//!   - Token service, Google ID-token verification, email delivery
//!
//! # Usage
//!
//! ```rust,no_run
//! use warden::backend::server::init::create_app;
//! use warden::shared::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::builder()
//!     .jwt_secret("access-secret")
//!     .jwt_refresh_secret("refresh-secret")
//!     .build()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Authentication Model
//!
//! Every login creates a server-side session. The client receives two
//! cookies: a short-lived `accessToken` (15 minutes) carrying the user and
//! session ids, and a long-lived `refreshToken` (30 days) scoped to the
//! refresh endpoint. Logging out deletes the session, which invalidates both.

/// Shared types and configuration
pub mod shared;

/// Backend server-side code
pub mod backend;
