/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the auth and
 * account handlers. Request bodies implement `Validate`; fields missing from
 * the JSON default to empty values so they are reported as field errors
 * rather than as a deserialization failure.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::sessions::Session;
use crate::backend::auth::users::{AuthProvider, User};
use crate::shared::validation::Checks;
use crate::shared::{SharedError, Validate};

/// Register request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    /// Plaintext password (hashed before storage)
    pub password: String,
    /// Must equal `password`
    pub confirm_password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), SharedError> {
        let mut checks = Checks::new();
        checks
            .email("email", &self.email)
            .password("password", &self.password);
        if self.password != self.confirm_password {
            checks.fail("confirmPassword", "Passwords do not match");
        }
        checks.finish()
    }
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), SharedError> {
        let mut checks = Checks::new();
        checks
            .email("email", &self.email)
            .password("password", &self.password);
        checks.finish()
    }
}

/// Google login request
///
/// `credential` is the ID token handed to the frontend by Google sign-in.
/// Its absence is reported by the handler, not by validation.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct GoogleLoginRequest {
    pub credential: Option<String>,
}

impl Validate for GoogleLoginRequest {
    fn validate(&self) -> Result<(), SharedError> {
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl Validate for ForgotPasswordRequest {
    fn validate(&self) -> Result<(), SharedError> {
        let mut checks = Checks::new();
        checks.email("email", &self.email);
        checks.finish()
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub verification_code: String,
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<(), SharedError> {
        let mut checks = Checks::new();
        checks.password("password", &self.password);
        if self.verification_code.trim().is_empty() {
            checks.fail("verificationCode", "Verification code is required");
        }
        checks.finish()
    }
}

/// User response (without sensitive data)
///
/// Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub verified: bool,
    pub avatar_url: String,
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            verified: user.verified,
            avatar_url: user.avatar_url,
            provider: user.provider,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of responses that only report success
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by register and Google login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthUserResponse {
    pub message: String,
    pub user: UserResponse,
}

/// One entry of `GET /sessions`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    /// True for the session the request was made with
    pub is_current: bool,
}

impl SessionResponse {
    pub fn from_session(session: Session, current: Uuid) -> Self {
        Self {
            is_current: session.id == current,
            id: session.id,
            user_agent: session.user_agent,
            created_at: session.created_at,
        }
    }
}
