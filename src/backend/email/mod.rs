//! Outgoing email.
//!
//! Verification and password reset emails go through an HTTP email API
//! (Resend-compatible: `POST` JSON with a bearer key, answer `{ "id": ... }`).
//! Without an API key the [`Mailer`] only logs what it would have sent, which
//! is what local development and the tests use.

pub mod templates;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::Config;

pub use templates::{password_reset_email, verify_email};

/// A rendered email, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

/// Sends mail through the configured email API
#[derive(Debug, Clone)]
pub struct ApiMailer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    sender: String,
}

impl ApiMailer {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            sender: sender.into(),
        }
    }

    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&SendRequest {
                from: &self.sender,
                to: [&message.to],
                subject: &message.subject,
                text: &message.text,
                html: &message.html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = response.json().await?;
        Ok(sent.id)
    }
}

/// Email delivery backend
#[derive(Debug, Clone)]
pub enum Mailer {
    /// Log messages instead of sending them
    Log,
    /// Deliver through the email API
    Api(ApiMailer),
}

impl Mailer {
    /// Pick the API mailer when a key is configured, logging otherwise
    pub fn from_config(config: &Config) -> Self {
        match &config.email_api_key {
            Some(key) => Self::Api(ApiMailer::new(
                config.email_api_url.clone(),
                key.clone(),
                config.email_sender.clone(),
            )),
            None => Self::Log,
        }
    }

    /// Send a message and return the provider's message id
    pub async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        match self {
            Self::Log => {
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    body = %message.text,
                    "email delivery disabled, logging message"
                );
                Ok(format!("logged-{}", uuid::Uuid::new_v4()))
            }
            Self::Api(api) => {
                let id = api.send(message).await?;
                tracing::info!(to = %message.to, id = %id, "email sent");
                Ok(id)
            }
        }
    }
}
