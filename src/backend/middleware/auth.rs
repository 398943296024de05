/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It reads the access token from the `accessToken`
 * cookie, verifies it, checks that the session it names still exists and
 * provides the user and session ids to handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::cookies::ACCESS_TOKEN_COOKIE;
use crate::backend::auth::sessions::get_session;
use crate::backend::auth::tokens::TokenError;
use crate::backend::error::{BackendError, ErrorCode};
use crate::backend::server::state::AppState;

/// Identity attached to authenticated requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

fn invalid_access_token(message: &str) -> BackendError {
    BackendError::with_code(StatusCode::UNAUTHORIZED, message, ErrorCode::InvalidAccessToken)
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the access token from the `accessToken` cookie
/// 2. Verifies the token
/// 3. Checks that the token's session exists and has not expired
/// 4. Attaches [`AuthenticatedUser`] to request extensions for use in handlers
///
/// Every rejection is a 401 carrying `errorCode: "InvalidAccessToken"`, the
/// client's cue to call the refresh endpoint.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| {
            tracing::debug!("Missing access token cookie");
            invalid_access_token("Not authorized")
        })?;

    let claims = state.tokens.verify_access(&token).map_err(|e| {
        tracing::debug!("Access token rejected: {}", e);
        match e {
            TokenError::Expired => invalid_access_token("Token expired"),
            TokenError::Invalid => invalid_access_token("Invalid token"),
        }
    })?;

    let now = Utc::now();
    get_session(&state.db, claims.session_id)
        .await?
        .filter(|session| session.user_id == claims.user_id && !session.is_expired(now))
        .ok_or_else(|| {
            tracing::warn!("Access token for ended session {}", claims.session_id);
            invalid_access_token("Session expired")
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
        session_id: claims.session_id,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// Only valid behind [`authenticate`]; elsewhere it rejects with 401.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                invalid_access_token("Not authorized")
            })?;

        Ok(AuthUser(user))
    }
}
