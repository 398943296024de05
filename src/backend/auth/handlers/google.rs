//! POST /auth/login/google

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::set_auth_cookies;
use crate::backend::auth::handlers::extract::{user_agent, ValidJson};
use crate::backend::auth::handlers::types::{AuthUserResponse, GoogleLoginRequest};
use crate::backend::auth::service::login_with_google;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Log in (or sign up) with a Google ID token
///
/// An existing local account with the same email is linked to the Google
/// identity instead of being duplicated.
pub async fn google_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidJson(request): ValidJson<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<AuthUserResponse>), BackendError> {
    let credential = request
        .credential
        .filter(|credential| !credential.trim().is_empty())
        .ok_or_else(|| BackendError::handler(StatusCode::BAD_REQUEST, "Missing credential"))?;

    let outcome = login_with_google(&state, &credential, user_agent(&headers)).await?;

    let jar = set_auth_cookies(
        jar,
        outcome.tokens.access_token,
        outcome.tokens.refresh_token,
        state.config.cookie_secure,
    );

    Ok((
        jar,
        Json(AuthUserResponse {
            message: "Google login successful".to_string(),
            user: outcome.user.into(),
        }),
    ))
}
