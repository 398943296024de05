/**
 * Account Handlers
 *
 * Endpoints for the logged-in user. All of them sit behind the
 * `authenticate` middleware and read the caller from `AuthUser`.
 *
 * - GET /user
 * - GET /sessions
 * - DELETE /sessions/{id}
 */

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::handlers::types::{MessageResponse, SessionResponse, UserResponse};
use crate::backend::auth::sessions::{delete_user_session, list_active_sessions};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;

const SESSION_NOT_FOUND: &str = "Session not found";

/// Return the current user
///
/// # Errors
///
/// * `404 Not Found` - The account was deleted after the token was issued
pub async fn current_user(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserResponse>, BackendError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

/// List the caller's active sessions, newest first
pub async fn list_sessions(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<Vec<SessionResponse>>, BackendError> {
    let sessions = list_active_sessions(&pool, auth.user_id).await?;

    Ok(Json(
        sessions
            .into_iter()
            .map(|session| SessionResponse::from_session(session, auth.session_id))
            .collect(),
    ))
}

/// Revoke one of the caller's sessions
///
/// Malformed ids and sessions of other users are reported as not found.
pub async fn delete_session(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    let id = Uuid::parse_str(&id).map_err(|_| BackendError::not_found(SESSION_NOT_FOUND))?;
    let removed = delete_user_session(&pool, id, auth.user_id).await?;
    if !removed {
        return Err(BackendError::not_found(SESSION_NOT_FOUND));
    }

    tracing::info!("User {} removed session {}", auth.user_id, id);
    Ok(Json(MessageResponse::new("Session removed")))
}
