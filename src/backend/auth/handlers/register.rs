/**
 * Register Handler
 *
 * POST /auth/register
 *
 * # Registration Process
 *
 * 1. Validate the body (email, password, matching confirmation)
 * 2. Create the account and mail a verification link
 * 3. Open a session and set both auth cookies
 */

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::set_auth_cookies;
use crate::backend::auth::handlers::extract::{user_agent, ValidJson};
use crate::backend::auth::handlers::types::{AuthUserResponse, RegisterRequest};
use crate::backend::auth::service::{create_account, CreateAccount};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Register handler
///
/// # Returns
///
/// `201 Created` with the new user and both auth cookies set
///
/// # Errors
///
/// * `400 Bad Request` - Body failed validation
/// * `409 Conflict` - Email already in use
///
/// # Example Request
///
/// ```http
/// POST /auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepassword123",
///   "confirmPassword": "securepassword123"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthUserResponse>), BackendError> {
    tracing::info!("Register request for: {}", request.email);

    let outcome = create_account(
        &state,
        CreateAccount {
            email: request.email,
            password: request.password,
            user_agent: user_agent(&headers),
        },
    )
    .await?;

    let jar = set_auth_cookies(
        jar,
        outcome.tokens.access_token,
        outcome.tokens.refresh_token,
        state.config.cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthUserResponse {
            message: "User registered successfully".to_string(),
            user: outcome.user.into(),
        }),
    ))
}
