//! Server Module
//!
//! Initializes the Axum application: connects the database, builds the
//! shared state and hands it to the router.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database connection and migrations
//! └── init.rs         - Server initialization and app creation
//! ```

/// Application state management
pub mod state;

/// Database connection and migrations
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;
