/**
 * Access and Refresh Tokens
 *
 * Both tokens are HS256 JWTs that name the session they belong to. The
 * access token is short-lived and also carries the user id; the refresh
 * token only carries the session id and is signed with its own secret, so
 * one can never be accepted in place of the other.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Audience claim carried by every token
pub const TOKEN_AUDIENCE: &str = "User";

/// Access tokens expire after 15 minutes
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Refresh tokens expire after 30 days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Claims of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub session_id: Uuid,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid,
        }
    }
}

/// A freshly minted access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies tokens with the configured secrets
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Sign an access token for `user_id` in `session_id`
    pub fn sign_access(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            user_id,
            session_id,
            aud: TOKEN_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.access_encoding)
    }

    /// Sign a refresh token for `session_id`
    pub fn sign_refresh(&self, session_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = RefreshClaims {
            session_id,
            aud: TOKEN_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(REFRESH_TOKEN_TTL_DAYS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.refresh_encoding)
    }

    /// Sign both tokens for a new session
    pub fn sign_pair(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: self.sign_access(user_id, session_id)?,
            refresh_token: self.sign_refresh(session_id)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verify(token, &self.access_decoding)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verify(token, &self.refresh_decoding)
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Result<T, TokenError> {
        let data = decode::<T>(token, key, &self.validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}
