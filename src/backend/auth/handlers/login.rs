/**
 * Login Handler
 *
 * POST /auth/login
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Open a session and set the access and refresh cookies
 *
 * Invalid credentials return 401 with the same message whether the email
 * is unknown or the password is wrong.
 */

use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::set_auth_cookies;
use crate::backend::auth::handlers::extract::{user_agent, ValidJson};
use crate::backend::auth::handlers::types::{LoginRequest, MessageResponse};
use crate::backend::auth::service::login_user;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Body failed validation
/// * `401 Unauthorized` - User not found, wrong password, or Google-only account
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), BackendError> {
    tracing::info!("Login request for: {}", request.email);

    let outcome = login_user(
        &state,
        &request.email,
        &request.password,
        user_agent(&headers),
    )
    .await?;

    let jar = set_auth_cookies(
        jar,
        outcome.tokens.access_token,
        outcome.tokens.refresh_token,
        state.config.cookie_secure,
    );

    Ok((jar, Json(MessageResponse::new("Login successful"))))
}
