/**
 * Verification Codes
 *
 * One-shot codes mailed to users for email verification and password
 * reset. The code id is the secret sent in the link; codes are deleted once
 * used and ignored once expired.
 */

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// What a verification code can be redeemed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
pub enum CodeKind {
    EmailVerification,
    PasswordReset,
}

impl CodeKind {
    /// How long a freshly issued code stays valid
    pub fn lifetime(self) -> Duration {
        match self {
            Self::EmailVerification => Duration::days(365),
            Self::PasswordReset => Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: CodeKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issue a new code of `kind` for a user
///
/// The user's expired codes are pruned first.
pub async fn create_code(
    pool: &SqlitePool,
    user_id: Uuid,
    kind: CodeKind,
) -> Result<VerificationCode, sqlx::Error> {
    let now = Utc::now();
    let pruned = delete_expired_codes(pool, user_id, now).await?;
    if pruned > 0 {
        tracing::debug!("Pruned {} expired codes for user {}", pruned, user_id);
    }

    sqlx::query_as::<_, VerificationCode>(
        r#"
        INSERT INTO verification_codes (id, user_id, kind, created_at, expires_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, kind, created_at, expires_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(kind)
    .bind(now)
    .bind(now + kind.lifetime())
    .fetch_one(pool)
    .await
}

/// Find an unexpired code of the given kind
pub async fn find_valid_code(
    pool: &SqlitePool,
    id: Uuid,
    kind: CodeKind,
) -> Result<Option<VerificationCode>, sqlx::Error> {
    let code = sqlx::query_as::<_, VerificationCode>(
        r#"
        SELECT id, user_id, kind, created_at, expires_at
        FROM verification_codes
        WHERE id = ? AND kind = ?
        "#,
    )
    .bind(id)
    .bind(kind)
    .fetch_optional(pool)
    .await?;

    let now = Utc::now();
    Ok(code.filter(|code| code.expires_at > now))
}

/// Number of codes of `kind` issued to a user since `since`
pub async fn count_codes_since(
    pool: &SqlitePool,
    user_id: Uuid,
    kind: CodeKind,
    since: DateTime<Utc>,
) -> Result<usize, sqlx::Error> {
    let issued: Vec<DateTime<Utc>> = sqlx::query_scalar(
        "SELECT created_at FROM verification_codes WHERE user_id = ? AND kind = ?",
    )
    .bind(user_id)
    .bind(kind)
    .fetch_all(pool)
    .await?;

    Ok(issued.into_iter().filter(|created| *created > since).count())
}

/// Delete every code of a user that expired before `now`
pub async fn delete_expired_codes(
    pool: &SqlitePool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let codes: Vec<(Uuid, DateTime<Utc>)> =
        sqlx::query_as("SELECT id, expires_at FROM verification_codes WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    let mut deleted = 0;
    for (id, expires_at) in codes {
        if expires_at <= now {
            delete_code(pool, id).await?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

pub async fn delete_code(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM verification_codes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
