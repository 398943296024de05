/**
 * Email Verification and Password Reset Handlers
 *
 * GET /auth/email/verify/{code}
 * POST /auth/password/forgot
 * POST /auth/password/reset
 */

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::auth::cookies::clear_auth_cookies;
use crate::backend::auth::handlers::extract::ValidJson;
use crate::backend::auth::handlers::types::{
    ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::backend::auth::service::{
    reset_password as reset, send_password_reset_email, verify_email as verify,
};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Confirm an email address from the link in the verification email
///
/// # Errors
///
/// * `404 Not Found` - Unknown, used or expired code
pub async fn verify_email(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    verify(&state, &code).await?;
    Ok(Json(MessageResponse::new("Email was successfully verified")))
}

/// Mail a password reset link
///
/// # Errors
///
/// * `404 Not Found` - No account with that email
/// * `429 Too Many Requests` - Too many reset requests in the last five minutes
/// * `500 Internal Server Error` - The email could not be sent
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    tracing::info!("Password reset requested for: {}", request.email);
    let sent = send_password_reset_email(&state, &request.email).await?;
    tracing::info!("Password reset email {} sent", sent.email_id);
    Ok(Json(MessageResponse::new("Password reset email sent")))
}

/// Set a new password with a reset code
///
/// Every session of the user is revoked and the caller's cookies cleared.
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(request): ValidJson<ResetPasswordRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), BackendError> {
    reset(&state, &request.password, &request.verification_code).await?;
    Ok((
        clear_auth_cookies(jar),
        Json(MessageResponse::new("Password was reset successfully")),
    ))
}
