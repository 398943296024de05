/**
 * Application State Management
 *
 * This module defines the application state structure and the `FromRef`
 * impl that lets account handlers extract the pool directly.
 *
 * # Architecture
 *
 * `AppState` is built once at startup and is read-only afterwards:
 * - the SQLite connection pool
 * - the loaded configuration
 * - the token signer, Google verifier and mailer
 *
 * Everything except the pool sits behind an `Arc`, so cloning the state for
 * each request is cheap.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::auth::google::GoogleVerifier;
use crate::backend::auth::tokens::TokenService;
use crate::backend::email::Mailer;
use crate::shared::Config;

/// Application state shared by every handler
///
/// # Usage
///
/// ```rust,no_run
/// use warden::backend::server::state::AppState;
/// use axum::extract::State;
///
/// async fn handler(State(state): State<AppState>) {
///     let _pool = &state.db;
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Settings loaded at startup
    pub config: Arc<Config>,

    /// Signs and verifies access/refresh tokens
    pub tokens: Arc<TokenService>,

    /// Validates Google ID tokens
    pub google: Arc<GoogleVerifier>,

    /// Sends verification and reset emails
    pub mailer: Arc<Mailer>,
}

impl AppState {
    /// Assemble the state from a connected pool and the configuration
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, &config.jwt_refresh_secret);
        let google = GoogleVerifier::new(
            config.google_tokeninfo_url.clone(),
            config.google_client_id.clone(),
        );
        let mailer = Mailer::from_config(&config);

        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            google: Arc::new(google),
            mailer: Arc::new(mailer),
        }
    }
}

/// Lets handlers extract the pool with `State(pool): State<SqlitePool>`
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}
