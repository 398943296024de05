//! Account Module
//!
//! Current user and session management for authenticated callers.

pub mod handlers;

pub use handlers::{current_user, delete_session, list_sessions};
