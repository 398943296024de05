//! Request body validation.
//!
//! Request types implement [`Validate`]; the backend's `ValidJson` extractor
//! runs it after deserialization so handlers only ever see checked input.

use regex::Regex;
use std::sync::LazyLock;

use crate::shared::error::{FieldError, SharedError};

pub const EMAIL_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 6;
/// bcrypt ignores everything past this many bytes
pub const PASSWORD_MAX_BYTES: usize = 72;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Check a deserialized request body
pub trait Validate {
    fn validate(&self) -> Result<(), SharedError>;
}

/// Normalize an email for lookup and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Collects field errors so every failing field is reported at once.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    pub fn email(&mut self, path: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            self.fail(path, "Email is required");
        } else if value.len() > EMAIL_MAX_LEN {
            self.fail(path, format!("Email must be at most {EMAIL_MAX_LEN} characters"));
        } else if !EMAIL_RE.as_ref().is_some_and(|re| re.is_match(value)) {
            self.fail(path, "Invalid email address");
        }
        self
    }

    pub fn password(&mut self, path: &str, value: &str) -> &mut Self {
        if value.chars().count() < PASSWORD_MIN_LEN {
            self.fail(
                path,
                format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
            );
        } else if value.len() > PASSWORD_MAX_BYTES {
            self.fail(
                path,
                format!("Password must be at most {PASSWORD_MAX_BYTES} bytes"),
            );
        }
        self
    }

    pub fn finish(self) -> Result<(), SharedError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SharedError::fields(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(checks: Checks) -> Vec<FieldError> {
        match checks.finish() {
            Ok(()) => Vec::new(),
            Err(SharedError::ValidationError { errors }) => errors,
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn accepts_valid_input() {
        let mut checks = Checks::new();
        checks.email("email", "a@example.com").password("password", "secret1");
        assert!(errors_of(checks).is_empty());
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["", "plainaddress", "a@b", "a b@example.com"] {
            let mut checks = Checks::new();
            checks.email("email", bad);
            let errors = errors_of(checks);
            assert_eq!(errors.len(), 1, "expected rejection for {bad:?}");
            assert_eq!(errors[0].path, "email");
        }
    }

    #[test]
    fn rejects_overlong_email() {
        let email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        let mut checks = Checks::new();
        checks.email("email", &email);
        assert_eq!(errors_of(checks).len(), 1);
    }

    #[test]
    fn password_length_bounds() {
        let mut checks = Checks::new();
        checks.password("password", "12345");
        assert_eq!(errors_of(checks).len(), 1);

        let mut checks = Checks::new();
        checks.password("password", "123456");
        assert!(errors_of(checks).is_empty());

        let mut checks = Checks::new();
        checks.password("password", &"x".repeat(PASSWORD_MAX_BYTES));
        assert!(errors_of(checks).is_empty());

        let mut checks = Checks::new();
        checks.password("password", &"x".repeat(PASSWORD_MAX_BYTES + 1));
        assert_eq!(errors_of(checks).len(), 1);
    }

    #[test]
    fn password_limit_counts_bytes() {
        // 25 three-byte characters are 75 bytes
        let mut checks = Checks::new();
        checks.password("password", &"€".repeat(25));
        let errors = errors_of(checks);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Password must be at most 72 bytes");
    }

    #[test]
    fn reports_every_failing_field() {
        let mut checks = Checks::new();
        checks.email("email", "nope").password("password", "1");
        let paths: Vec<_> = errors_of(checks).into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["email", "password"]);
    }
}
