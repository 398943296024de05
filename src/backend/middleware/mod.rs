//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - The `authenticate` layer guarding account routes, and the
//!   `AuthUser` extractor handlers behind it use
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn_with_state, Router};
//! use warden::backend::middleware::authenticate;
//! use warden::backend::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(from_fn_with_state(state, authenticate))
//! }
//! ```

pub mod auth;

pub use auth::{authenticate, AuthUser, AuthenticatedUser};
