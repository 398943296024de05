//! Application configuration module
//!
//! `Config` holds every setting the server reads at startup. It is built
//! either programmatically through [`ConfigBuilder`] (tests do this) or from
//! environment variables through [`Config::from_lookup`] /
//! [`Config::from_env`].

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://warden.db";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_EMAIL_SENDER: &str = "onboarding@resend.dev";
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLx connection string for the user/session database
    pub database_url: String,
    /// TCP port the HTTP server binds to
    pub port: u16,
    /// Frontend origin; used for CORS and for links in outgoing email
    pub app_origin: String,
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    /// HMAC secret for refresh tokens
    pub jwt_refresh_secret: String,
    /// OAuth client id expected as the audience of Google ID tokens.
    /// Google login is disabled when unset.
    pub google_client_id: Option<String>,
    /// Google endpoint that validates ID tokens
    pub google_tokeninfo_url: String,
    /// Transactional email API endpoint
    pub email_api_url: String,
    /// API key for the email endpoint. Emails are only logged when unset.
    pub email_api_key: Option<String>,
    /// `From` address on outgoing email
    pub email_sender: String,
    /// Whether auth cookies carry the `Secure` attribute
    pub cookie_secure: bool,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Config {
    /// Create a new ConfigBuilder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// `from_env` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder();

        if let Some(url) = lookup("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(port) = lookup("SERVER_PORT") {
            let port = port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                message: e.to_string(),
            })?;
            builder = builder.port(port);
        }
        if let Some(origin) = lookup("APP_ORIGIN") {
            builder = builder.app_origin(origin);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Some(secret) = lookup("JWT_REFRESH_SECRET") {
            builder = builder.jwt_refresh_secret(secret);
        }
        if let Some(client_id) = lookup("GOOGLE_CLIENT_ID").filter(|v| !v.is_empty()) {
            builder = builder.google_client_id(client_id);
        }
        if let Some(url) = lookup("GOOGLE_TOKENINFO_URL") {
            builder = builder.google_tokeninfo_url(url);
        }
        if let Some(url) = lookup("EMAIL_API_URL") {
            builder = builder.email_api_url(url);
        }
        if let Some(key) = lookup("EMAIL_API_KEY").filter(|v| !v.is_empty()) {
            builder = builder.email_api_key(key);
        }
        if let Some(sender) = lookup("EMAIL_SENDER") {
            builder = builder.email_sender(sender);
        }

        let development = lookup("APP_ENV").is_some_and(|env| env == "development");
        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => parse_bool("COOKIE_SECURE", &value)?,
            None => !development,
        };
        builder = builder.cookie_secure(cookie_secure);

        if let Some(cost) = lookup("BCRYPT_COST") {
            let cost = cost.parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: e.to_string(),
            })?;
            builder = builder.bcrypt_cost(cost);
        }

        builder.build()
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.jwt_refresh_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_REFRESH_SECRET"));
        }
        if !(self.app_origin.starts_with("http://") || self.app_origin.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.app_origin.clone()));
        }
        // bcrypt rejects costs outside 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is outside 4..=31", self.bcrypt_cost),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key,
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    database_url: Option<String>,
    port: Option<u16>,
    app_origin: Option<String>,
    jwt_secret: Option<String>,
    jwt_refresh_secret: Option<String>,
    google_client_id: Option<String>,
    google_tokeninfo_url: Option<String>,
    email_api_url: Option<String>,
    email_api_key: Option<String>,
    email_sender: Option<String>,
    cookie_secure: Option<bool>,
    bcrypt_cost: Option<u32>,
}

impl ConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn app_origin(mut self, origin: impl Into<String>) -> Self {
        self.app_origin = Some(origin.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn jwt_refresh_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_refresh_secret = Some(secret.into());
        self
    }

    pub fn google_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.google_client_id = Some(client_id.into());
        self
    }

    pub fn google_tokeninfo_url(mut self, url: impl Into<String>) -> Self {
        self.google_tokeninfo_url = Some(url.into());
        self
    }

    pub fn email_api_url(mut self, url: impl Into<String>) -> Self {
        self.email_api_url = Some(url.into());
        self
    }

    pub fn email_api_key(mut self, key: impl Into<String>) -> Self {
        self.email_api_key = Some(key.into());
        self
    }

    pub fn email_sender(mut self, sender: impl Into<String>) -> Self {
        self.email_sender = Some(sender.into());
        self
    }

    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = Some(secure);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Build the configuration
    ///
    /// Fails when either JWT secret is missing or a value does not validate.
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = Config {
            database_url: self
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            app_origin: self
                .app_origin
                .unwrap_or_else(|| DEFAULT_APP_ORIGIN.to_string()),
            jwt_secret: self.jwt_secret.ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            jwt_refresh_secret: self
                .jwt_refresh_secret
                .ok_or(ConfigError::MissingValue("JWT_REFRESH_SECRET"))?,
            google_client_id: self.google_client_id,
            google_tokeninfo_url: self
                .google_tokeninfo_url
                .unwrap_or_else(|| DEFAULT_GOOGLE_TOKENINFO_URL.to_string()),
            email_api_url: self
                .email_api_url
                .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            email_api_key: self.email_api_key,
            email_sender: self
                .email_sender
                .unwrap_or_else(|| DEFAULT_EMAIL_SENDER.to_string()),
            cookie_secure: self.cookie_secure.unwrap_or(true),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
