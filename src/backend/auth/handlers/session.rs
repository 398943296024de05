/**
 * Logout and Refresh Handlers
 *
 * POST /auth/logout ends the session named by the access token cookie.
 * GET /auth/refresh trades the refresh token cookie for a new access token.
 * Both clear the auth cookies when they leave the user logged out.
 */

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::{
    clear_auth_cookies, set_access_cookie, set_refresh_cookie, ACCESS_TOKEN_COOKIE,
    REFRESH_TOKEN_COOKIE,
};
use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::service::{logout as end_session, refresh_access_token};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Logout handler
///
/// Always succeeds and always clears both cookies; a database failure while
/// deleting the session is logged.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let access_token = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string());

    if let Err(e) = end_session(&state, access_token.as_deref()).await {
        tracing::error!("Failed to delete session on logout: {}", e);
    }

    (
        clear_auth_cookies(jar),
        Json(MessageResponse::new("Logout successful")),
    )
}

/// Refresh handler
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid refresh token, or the session
///   is gone. The auth cookies are cleared.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), (CookieJar, BackendError)> {
    let refresh_token = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());

    let outcome = match refresh_access_token(&state, refresh_token.as_deref()).await {
        Ok(outcome) => outcome,
        Err(e) => return Err((clear_auth_cookies(jar), e)),
    };

    let secure = state.config.cookie_secure;
    let mut jar = set_access_cookie(jar, outcome.access_token, secure);
    if let Some(refresh_token) = outcome.refresh_token {
        jar = set_refresh_cookie(jar, refresh_token, secure);
    }

    Ok((jar, Json(MessageResponse::new("Access token refreshed"))))
}
