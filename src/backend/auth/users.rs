/**
 * User Model and Database Operations
 *
 * This module handles user records: creation, lookups and the handful of
 * updates the auth flows need (verification flag, password, provider).
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Avatar assigned when no other picture is known
pub const DEFAULT_AVATAR_URL: &str =
    "https://i.pinimg.com/736x/41/76/b9/4176b9b864c1947320764e82477c168f.jpg";

const USER_COLUMNS: &str =
    "id, email, password_hash, verified, avatar_url, provider, created_at, updated_at";

/// How a user is able to sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email and password only
    Local,
    /// Google ID token only; the user has no password
    Google,
    /// Both a password and a linked Google identity
    #[serde(rename = "google+local")]
    #[sqlx(rename = "google+local")]
    Merged,
}

impl AuthProvider {
    /// Whether users with this provider have a stored password
    pub fn has_password(self) -> bool {
        matches!(self, Self::Local | Self::Merged)
    }

    /// Provider after a successful Google login
    pub fn linked_with_google(self) -> Self {
        match self {
            Self::Local => Self::Merged,
            other => other,
        }
    }

    /// Provider after a password has been set
    pub fn with_password(self) -> Self {
        match self {
            Self::Google => Self::Merged,
            other => other,
        }
    }
}

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Normalized email address (unique)
    pub email: String,
    /// bcrypt hash; `None` for Google-only accounts
    pub password_hash: Option<String>,
    /// Whether the email address has been confirmed
    pub verified: bool,
    pub avatar_url: String,
    pub provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub verified: bool,
    pub avatar_url: Option<String>,
    pub provider: AuthProvider,
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `new_user` - Email, optional password hash, flags
///
/// # Returns
/// Created user or error. A duplicate email surfaces as a unique-violation
/// database error.
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let avatar_url = new_user
        .avatar_url
        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users
            (id, email, password_hash, verified, avatar_url, provider, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.verified)
    .bind(&avatar_url)
    .bind(new_user.provider)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Mark a user's email as verified
///
/// Returns `None` when the user no longer exists.
pub async fn mark_verified(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET verified = TRUE, updated_at = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Replace a user's password hash, adjusting the provider so the password
/// invariant keeps holding.
pub async fn set_password(
    pool: &SqlitePool,
    id: Uuid,
    password_hash: &str,
    provider: AuthProvider,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET password_hash = ?, provider = ?, updated_at = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(password_hash)
    .bind(provider.with_password())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Update a user's provider
pub async fn set_provider(
    pool: &SqlitePool,
    id: Uuid,
    provider: AuthProvider,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET provider = ?, updated_at = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(provider)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}

/// True when `err` is a unique-constraint violation (duplicate email)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
