/**
 * Auth Routes
 *
 * Public endpoints under `/auth`.
 *
 * - `POST /auth/register` - Create an account
 * - `POST /auth/login` - Email and password login
 * - `POST /auth/login/google` - Google ID token login
 * - `POST /auth/logout` - End the current session
 * - `GET /auth/refresh` - New access token from the refresh cookie
 * - `GET /auth/email/verify/{code}` - Confirm an email address
 * - `POST /auth/password/forgot` - Mail a reset link
 * - `POST /auth/password/reset` - Set a new password
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{
    forgot_password, google_login, login, logout, refresh, register, reset_password, verify_email,
};
use crate::backend::server::state::AppState;

/// Routes mounted at `/auth`
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/login/google", post(google_login))
        .route("/logout", post(logout))
        .route("/refresh", get(refresh))
        .route("/email/verify/{code}", get(verify_email))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset", post(reset_password))
}

/// Add the auth routes to `router`
pub fn configure_auth_routes(router: Router<AppState>) -> Router<AppState> {
    router.nest("/auth", auth_routes())
}
