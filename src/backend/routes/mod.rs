//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Main router creation, layers, health check
//! ├── auth_routes.rs     - Public `/auth` endpoints
//! └── account_routes.rs  - Authenticated account endpoints
//! ```

/// Main router creation
pub mod router;

/// Public auth endpoints
pub mod auth_routes;

/// Authenticated account endpoints
pub mod account_routes;

// Re-export commonly used functions
pub use router::create_router;
