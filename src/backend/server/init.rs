/**
 * Server Initialization
 *
 * Builds the Axum application from a validated configuration.
 *
 * # Initialization Process
 *
 * 1. Validate the configuration
 * 2. Connect to the database and run migrations
 * 3. Build the shared state (token signer, Google verifier, mailer)
 * 4. Create the router
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::Config;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the configuration is invalid, the database cannot be opened,
/// or a migration fails.
pub async fn create_app(config: Config) -> Result<Router, BackendError> {
    tracing::info!("Initializing warden auth server");

    config.validate().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    let pool = load_database(&config.database_url).await?;
    let state = AppState::new(pool, config);

    if !state.google.is_configured() {
        tracing::warn!("GOOGLE_CLIENT_ID not set. Google login will be disabled.");
    }
    if state.config.email_api_key.is_none() {
        tracing::warn!("EMAIL_API_KEY not set. Emails will be logged instead of sent.");
    }

    let app = create_router(state)?;
    tracing::info!("Router configured");
    Ok(app)
}
