/**
 * Authentication Service
 *
 * The flows behind the auth endpoints. Handlers validate the request body,
 * call one function here and turn the outcome into cookies and JSON.
 *
 * # Flows
 *
 * - account creation and local login
 * - Google login with account linking
 * - logout and access token refresh
 * - email verification
 * - forgot/reset password
 *
 * Every successful login creates a session row; both tokens name that
 * session, so deleting the row revokes them.
 */

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::backend::auth::google::{GoogleIdentity, GoogleVerifyError};
use crate::backend::auth::password::{hash_password, verify_password};
use crate::backend::auth::sessions::{
    create_session, delete_session, delete_sessions_for_user, extend_session, get_session,
    session_expiry,
};
use crate::backend::auth::tokens::{TokenError, TokenPair};
use crate::backend::auth::users::{
    create_user, get_user_by_email, get_user_by_id, is_unique_violation, mark_verified,
    set_password, set_provider, AuthProvider, NewUser, User,
};
use crate::backend::auth::verification::{
    count_codes_since, create_code, delete_code, find_valid_code, CodeKind,
};
use crate::backend::email::{password_reset_email, verify_email as verify_email_message};
use crate::backend::error::{ensure, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::validation::normalize_email;

/// Password reset requests allowed per user inside [`RESET_WINDOW_MINUTES`]
pub const MAX_RESET_REQUESTS: usize = 2;
pub const RESET_WINDOW_MINUTES: i64 = 5;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_CODE: &str = "Invalid or expired verification code";

/// A logged-in user and the tokens for their new session
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub session_id: Uuid,
    pub tokens: TokenPair,
}

/// Result of a refresh. `refresh_token` is set when the session was renewed.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Result of a password reset request
#[derive(Debug, Clone)]
pub struct PasswordResetSent {
    pub url: String,
    /// Id the mail provider assigned to the message
    pub email_id: String,
}

/// Input for [`create_account`]
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
}

/// Open a session for `user` and sign its tokens
async fn start_session(
    state: &AppState,
    user: User,
    user_agent: Option<String>,
) -> Result<AuthOutcome, BackendError> {
    let session = create_session(&state.db, user.id, user_agent).await?;
    let tokens = state.tokens.sign_pair(user.id, session.id)?;
    Ok(AuthOutcome {
        user,
        session_id: session.id,
        tokens,
    })
}

/// Register a local account and log it in
///
/// # Errors
/// * `409 Conflict` - the email is already registered
pub async fn create_account(
    state: &AppState,
    input: CreateAccount,
) -> Result<AuthOutcome, BackendError> {
    let email = normalize_email(&input.email);

    let existing = get_user_by_email(&state.db, &email).await?;
    ensure(existing.is_none(), StatusCode::CONFLICT, "Email already in use")?;

    let password_hash = hash_password(&input.password, state.config.bcrypt_cost)?;

    let user = create_user(
        &state.db,
        NewUser {
            email,
            password_hash: Some(password_hash),
            verified: false,
            avatar_url: None,
            provider: AuthProvider::Local,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            BackendError::handler(StatusCode::CONFLICT, "Email already in use")
        } else {
            e.into()
        }
    })?;

    let code = create_code(&state.db, user.id, CodeKind::EmailVerification).await?;
    let url = format!("{}/email/verify/{}", state.config.app_origin, code.id);
    if let Err(e) = state.mailer.send(&verify_email_message(&user.email, &url)).await {
        tracing::warn!("Failed to send verification email to {}: {}", user.email, e);
    }

    tracing::info!("User registered: {} ({})", user.email, user.id);
    start_session(state, user, input.user_agent).await
}

/// Log in with email and password
///
/// Unknown emails, wrong passwords and Google-only accounts all fail with
/// the same 401.
pub async fn login_user(
    state: &AppState,
    email: &str,
    password: &str,
    user_agent: Option<String>,
) -> Result<AuthOutcome, BackendError> {
    let email = normalize_email(email);

    let user = get_user_by_email(&state.db, &email).await?.ok_or_else(|| {
        tracing::warn!("Login for unknown email: {}", email);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    let hash = user
        .password_hash
        .as_deref()
        .filter(|_| user.provider.has_password())
        .ok_or_else(|| {
            tracing::warn!("Password login for Google-only account: {}", email);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    if !verify_password(password, hash)? {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    tracing::info!("User logged in: {}", user.email);
    start_session(state, user, user_agent).await
}

fn google_error(err: GoogleVerifyError) -> BackendError {
    match err {
        GoogleVerifyError::NotConfigured => BackendError::handler(
            StatusCode::SERVICE_UNAVAILABLE,
            "Google login is not configured",
        ),
        GoogleVerifyError::InvalidToken(reason) => {
            tracing::warn!("Rejected Google token: {}", reason);
            BackendError::unauthorized("Invalid Google token")
        }
        GoogleVerifyError::MissingEmail => {
            BackendError::handler(StatusCode::BAD_REQUEST, "Invalid Google token")
        }
        GoogleVerifyError::Transport(e) => {
            tracing::error!("Google tokeninfo request failed: {}", e);
            BackendError::upstream("Could not verify Google token")
        }
    }
}

/// Find or create the user a Google identity belongs to
///
/// A local account with the same email is linked rather than duplicated.
async fn link_google_identity(
    state: &AppState,
    identity: GoogleIdentity,
) -> Result<User, BackendError> {
    let email = normalize_email(&identity.email);

    if let Some(user) = get_user_by_email(&state.db, &email).await? {
        let provider = user.provider.linked_with_google();
        if provider == user.provider {
            return Ok(user);
        }
        tracing::info!("Linking Google identity to local account: {}", email);
        return Ok(set_provider(&state.db, user.id, provider).await?);
    }

    tracing::info!("Creating account for Google user {} ({})", email, identity.name);
    let created = create_user(
        &state.db,
        NewUser {
            email: email.clone(),
            password_hash: None,
            verified: true,
            avatar_url: identity.picture,
            provider: AuthProvider::Google,
        },
    )
    .await;

    match created {
        Ok(user) => Ok(user),
        // Lost a race with a concurrent signup for the same email
        Err(e) if is_unique_violation(&e) => get_user_by_email(&state.db, &email)
            .await?
            .ok_or_else(|| e.into()),
        Err(e) => Err(e.into()),
    }
}

/// Log in with a Google ID token
pub async fn login_with_google(
    state: &AppState,
    credential: &str,
    user_agent: Option<String>,
) -> Result<AuthOutcome, BackendError> {
    let identity = state.google.verify(credential).await.map_err(google_error)?;
    let user = link_google_identity(state, identity).await?;

    tracing::info!("Google login: {}", user.email);
    start_session(state, user, user_agent).await
}

/// End the session named by an access token
///
/// Missing or invalid tokens are ignored; logging out always succeeds.
pub async fn logout(state: &AppState, access_token: Option<&str>) -> Result<(), BackendError> {
    let Some(token) = access_token else {
        return Ok(());
    };

    match state.tokens.verify_access(token) {
        Ok(claims) => {
            if delete_session(&state.db, claims.session_id).await? {
                tracing::info!("Session {} ended", claims.session_id);
            }
        }
        Err(e) => tracing::debug!("Logout with unusable access token: {}", e),
    }
    Ok(())
}

/// Issue a new access token from a refresh token
///
/// Sessions close to expiry are extended and get a new refresh token.
pub async fn refresh_access_token(
    state: &AppState,
    refresh_token: Option<&str>,
) -> Result<RefreshOutcome, BackendError> {
    let token = refresh_token.ok_or_else(|| BackendError::unauthorized("Missing refresh token"))?;

    let claims = state.tokens.verify_refresh(token).map_err(|e: TokenError| {
        tracing::debug!("Refresh token rejected: {}", e);
        BackendError::unauthorized("Invalid refresh token")
    })?;

    let now = Utc::now();
    let session = get_session(&state.db, claims.session_id)
        .await?
        .filter(|session| !session.is_expired(now))
        .ok_or_else(|| BackendError::unauthorized("Session expired"))?;

    let refresh_token = if session.needs_renewal(now) {
        extend_session(&state.db, session.id, session_expiry(now)).await?;
        tracing::info!("Session {} renewed", session.id);
        Some(state.tokens.sign_refresh(session.id)?)
    } else {
        None
    };

    let access_token = state.tokens.sign_access(session.user_id, session.id)?;
    Ok(RefreshOutcome {
        access_token,
        refresh_token,
    })
}

fn parse_code(code: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(code.trim()).map_err(|_| BackendError::not_found(INVALID_CODE))
}

/// Redeem an email verification code
pub async fn verify_email(state: &AppState, code: &str) -> Result<User, BackendError> {
    let code_id = parse_code(code)?;
    let code = find_valid_code(&state.db, code_id, CodeKind::EmailVerification)
        .await?
        .ok_or_else(|| BackendError::not_found(INVALID_CODE))?;

    let user = mark_verified(&state.db, code.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    delete_code(&state.db, code.id).await?;

    tracing::info!("Email verified: {}", user.email);
    Ok(user)
}

/// Mail a password reset link
///
/// # Errors
/// * `404 Not Found` - no account with that email
/// * `429 Too Many Requests` - too many requests in the last few minutes
/// * `500` - the email could not be sent
pub async fn send_password_reset_email(
    state: &AppState,
    email: &str,
) -> Result<PasswordResetSent, BackendError> {
    let email = normalize_email(email);
    let user = get_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let since = Utc::now() - Duration::minutes(RESET_WINDOW_MINUTES);
    let recent = count_codes_since(&state.db, user.id, CodeKind::PasswordReset, since).await?;
    ensure(
        recent < MAX_RESET_REQUESTS,
        StatusCode::TOO_MANY_REQUESTS,
        "Too many requests, please try again later",
    )?;

    let code = create_code(&state.db, user.id, CodeKind::PasswordReset).await?;
    let url = format!(
        "{}/password/reset?code={}&exp={}",
        state.config.app_origin,
        code.id,
        code.expires_at.timestamp_millis()
    );

    let email_id = state
        .mailer
        .send(&password_reset_email(&user.email, &url))
        .await?;

    Ok(PasswordResetSent { url, email_id })
}

/// Set a new password from a reset code and revoke every session
pub async fn reset_password(
    state: &AppState,
    password: &str,
    code: &str,
) -> Result<User, BackendError> {
    let code_id = parse_code(code)?;
    let code = find_valid_code(&state.db, code_id, CodeKind::PasswordReset)
        .await?
        .ok_or_else(|| BackendError::not_found(INVALID_CODE))?;

    let user = get_user_by_id(&state.db, code.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let password_hash = hash_password(password, state.config.bcrypt_cost)?;
    let user = set_password(&state.db, user.id, &password_hash, user.provider)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    delete_code(&state.db, code.id).await?;
    let revoked = delete_sessions_for_user(&state.db, user.id).await?;

    tracing::info!("Password reset for {}; {} sessions revoked", user.email, revoked);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::sessions::list_active_sessions;
    use crate::backend::test_support::{test_state, test_state_with};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn account(email: &str, password: &str) -> CreateAccount {
        CreateAccount {
            email: email.to_string(),
            password: password.to_string(),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_account() {
        let state = test_state().await;
        let outcome = create_account(&state, account(" New@Example.com ", "password123"))
            .await
            .unwrap();

        assert_eq!(outcome.user.email, "new@example.com");
        assert_eq!(outcome.user.provider, AuthProvider::Local);
        assert!(!outcome.user.verified);

        let hash = outcome.user.password_hash.as_deref().unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123", hash).unwrap());

        let claims = state.tokens.verify_access(&outcome.tokens.access_token).unwrap();
        assert_eq!(claims.user_id, outcome.user.id);
        assert_eq!(claims.session_id, outcome.session_id);

        let pending: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM verification_codes WHERE kind = 'email_verification'",
        )
        .fetch_one(&state.db)
        .await
        .unwrap();
        assert_eq!(pending, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let state = test_state().await;
        create_account(&state, account("dup@example.com", "password123")).await.unwrap();

        let err = create_account(&state, account("DUP@example.com", "password456"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Email already in use");
    }

    #[tokio::test]
    async fn test_login() {
        let state = test_state().await;
        create_account(&state, account("l@example.com", "password123")).await.unwrap();

        let outcome = login_user(&state, "l@example.com", "password123", None).await.unwrap();
        assert!(!outcome.tokens.access_token.is_empty());
        assert!(state.tokens.verify_refresh(&outcome.tokens.refresh_token).is_ok());

        let attempts = [("l@example.com", "wrong-pass"), ("x@example.com", "password123")];
        for (email, password) in attempts {
            let err = login_user(&state, email, password, None).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.message(), INVALID_CREDENTIALS);
        }
    }

    #[tokio::test]
    async fn test_logout_removes_session() {
        let state = test_state().await;
        let outcome = create_account(&state, account("o@example.com", "password123"))
            .await
            .unwrap();

        logout(&state, Some(&outcome.tokens.access_token)).await.unwrap();
        assert!(get_session(&state.db, outcome.session_id).await.unwrap().is_none());

        logout(&state, None).await.unwrap();
        logout(&state, Some("garbage")).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh() {
        let state = test_state().await;
        let outcome = create_account(&state, account("r@example.com", "password123"))
            .await
            .unwrap();

        let refreshed = refresh_access_token(&state, Some(&outcome.tokens.refresh_token))
            .await
            .unwrap();
        assert!(refreshed.refresh_token.is_none());
        let claims = state.tokens.verify_access(&refreshed.access_token).unwrap();
        assert_eq!(claims.session_id, outcome.session_id);

        let err = refresh_access_token(&state, None).await.unwrap_err();
        assert_eq!(err.message(), "Missing refresh token");

        let err = refresh_access_token(&state, Some(&outcome.tokens.access_token))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid refresh token");
    }

    #[tokio::test]
    async fn test_refresh_renews_expiring_session() {
        let state = test_state().await;
        let outcome = create_account(&state, account("rn@example.com", "password123"))
            .await
            .unwrap();
        extend_session(&state.db, outcome.session_id, Utc::now() + Duration::hours(2))
            .await
            .unwrap();

        let refreshed = refresh_access_token(&state, Some(&outcome.tokens.refresh_token))
            .await
            .unwrap();
        assert!(refreshed.refresh_token.is_some());

        let session = get_session(&state.db, outcome.session_id).await.unwrap().unwrap();
        assert!(session.expires_at > Utc::now() + Duration::days(29));
    }

    #[tokio::test]
    async fn test_refresh_with_expired_or_deleted_session() {
        let state = test_state().await;
        let outcome = create_account(&state, account("x@example.com", "password123"))
            .await
            .unwrap();
        extend_session(&state.db, outcome.session_id, Utc::now() - Duration::minutes(1))
            .await
            .unwrap();

        let err = refresh_access_token(&state, Some(&outcome.tokens.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Session expired");

        delete_session(&state.db, outcome.session_id).await.unwrap();
        let err = refresh_access_token(&state, Some(&outcome.tokens.refresh_token))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Session expired");
    }

    #[tokio::test]
    async fn test_verify_email_consumes_code() {
        let state = test_state().await;
        let outcome = create_account(&state, account("v@example.com", "password123"))
            .await
            .unwrap();
        let code: Uuid = sqlx::query_scalar("SELECT id FROM verification_codes WHERE user_id = ?")
            .bind(outcome.user.id)
            .fetch_one(&state.db)
            .await
            .unwrap();

        let user = verify_email(&state, &code.to_string()).await.unwrap();
        assert!(user.verified);

        let err = verify_email(&state, &code.to_string()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let err = verify_email(&state, "not-a-code").await.unwrap_err();
        assert_eq!(err.message(), INVALID_CODE);
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let state = test_state().await;
        let outcome = create_account(&state, account("p@example.com", "password123"))
            .await
            .unwrap();
        login_user(&state, "p@example.com", "password123", None).await.unwrap();

        let sent = send_password_reset_email(&state, "p@example.com").await.unwrap();
        assert!(sent.url.starts_with("http://localhost:5173/password/reset?code="));
        assert!(sent.url.contains("&exp="));
        assert!(sent.email_id.starts_with("logged-"));

        let code = sent
            .url
            .split("code=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap()
            .to_string();

        let user = reset_password(&state, "new-password", &code).await.unwrap();
        assert!(verify_password("new-password", user.password_hash.as_deref().unwrap()).unwrap());
        assert!(list_active_sessions(&state.db, outcome.user.id).await.unwrap().is_empty());

        let err = reset_password(&state, "another-one", &code).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_password_reset_rate_limit() {
        let state = test_state().await;
        create_account(&state, account("rl@example.com", "password123")).await.unwrap();

        send_password_reset_email(&state, "rl@example.com").await.unwrap();
        send_password_reset_email(&state, "rl@example.com").await.unwrap();
        let err = send_password_reset_email(&state, "rl@example.com").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);

        let err = send_password_reset_email(&state, "nobody@example.com").await.unwrap_err();
        assert_eq!(err.message(), "User not found");
    }

    async fn google_server(email: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aud": "test-client",
                "iss": "accounts.google.com",
                "email": email,
                "email_verified": "true",
                "picture": "https://example.com/pic.png"
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_google_login_links_local_account() {
        let server = google_server("both@example.com").await;
        let state = test_state_with(|builder| {
            builder
                .google_client_id("test-client")
                .google_tokeninfo_url(format!("{}/tokeninfo", server.uri()))
        })
        .await;

        let local = create_account(&state, account("both@example.com", "password123"))
            .await
            .unwrap();
        let outcome = login_with_google(&state, "credential", None).await.unwrap();

        assert_eq!(outcome.user.id, local.user.id);
        assert_eq!(outcome.user.provider, AuthProvider::Merged);
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(users, 1);

        // password login keeps working after linking
        login_user(&state, "both@example.com", "password123", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_google_login_creates_account() {
        let server = google_server("fresh@example.com").await;
        let state = test_state_with(|builder| {
            builder
                .google_client_id("test-client")
                .google_tokeninfo_url(format!("{}/tokeninfo", server.uri()))
        })
        .await;

        let outcome = login_with_google(&state, "credential", None).await.unwrap();
        assert_eq!(outcome.user.provider, AuthProvider::Google);
        assert!(outcome.user.verified);
        assert!(outcome.user.password_hash.is_none());
        assert_eq!(outcome.user.avatar_url, "https://example.com/pic.png");

        let err = login_user(&state, "fresh@example.com", "whatever1", None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let again = login_with_google(&state, "credential", None).await.unwrap();
        assert_eq!(again.user.id, outcome.user.id);
    }

    #[tokio::test]
    async fn test_google_login_not_configured() {
        let state = test_state().await;
        let err = login_with_google(&state, "credential", None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_reset_gives_google_user_a_password() {
        let server = google_server("g@example.com").await;
        let state = test_state_with(|builder| {
            builder
                .google_client_id("test-client")
                .google_tokeninfo_url(format!("{}/tokeninfo", server.uri()))
        })
        .await;
        login_with_google(&state, "credential", None).await.unwrap();

        let sent = send_password_reset_email(&state, "g@example.com").await.unwrap();
        let code = sent.url.split("code=").nth(1).unwrap().split('&').next().unwrap();
        let user = reset_password(&state, "new-password", code).await.unwrap();

        assert_eq!(user.provider, AuthProvider::Merged);
        login_user(&state, "g@example.com", "new-password", None).await.unwrap();
    }
}
