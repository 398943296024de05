/**
 * Google ID Token Verification
 *
 * Google sign-in hands the frontend an ID token ("credential"). We ask
 * Google's tokeninfo endpoint to validate it and then check that it was
 * issued by Google for our OAuth client.
 */

use serde::Deserialize;
use thiserror::Error;

/// Issuers Google uses on ID tokens
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Display name used when the token carries none
pub const DEFAULT_GOOGLE_NAME: &str = "Google User";

/// Identity extracted from a verified ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Debug, Error)]
pub enum GoogleVerifyError {
    /// No OAuth client id configured
    #[error("Google login is not configured")]
    NotConfigured,
    /// Google rejected the token, or it was not meant for us
    #[error("Invalid Google token: {0}")]
    InvalidToken(String),
    /// The token is valid but carries no email address
    #[error("Google token has no email")]
    MissingEmail,
    /// Google could not be reached or answered with garbage
    #[error("Google tokeninfo request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Payload returned by the tokeninfo endpoint. Every value is a string.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    iss: Option<String>,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Verifies Google ID tokens against the tokeninfo endpoint
#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    client: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleVerifier {
    pub fn new(tokeninfo_url: impl Into<String>, client_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokeninfo_url: tokeninfo_url.into(),
            client_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    /// Validate `credential` and return the identity it asserts
    pub async fn verify(&self, credential: &str) -> Result<GoogleIdentity, GoogleVerifyError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(GoogleVerifyError::NotConfigured)?;

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", credential)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GoogleVerifyError::InvalidToken(format!(
                "tokeninfo answered {}",
                response.status()
            )));
        }

        let info: TokenInfo = response.json().await?;

        if info.aud.as_deref() != Some(client_id) {
            return Err(GoogleVerifyError::InvalidToken("audience mismatch".to_string()));
        }
        if !info
            .iss
            .as_deref()
            .is_some_and(|iss| GOOGLE_ISSUERS.contains(&iss))
        {
            return Err(GoogleVerifyError::InvalidToken("unexpected issuer".to_string()));
        }
        if info.email_verified.as_deref() == Some("false") {
            return Err(GoogleVerifyError::InvalidToken("email not verified".to_string()));
        }

        let email = info
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(GoogleVerifyError::MissingEmail)?;

        Ok(GoogleIdentity {
            email,
            name: info
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_GOOGLE_NAME.to_string()),
            picture: info.picture.filter(|picture| !picture.is_empty()),
        })
    }
}
