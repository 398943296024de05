/**
 * Session Records
 *
 * A session is created for every successful login and scopes the validity
 * of the refresh token to that login. Both tokens embed the session id, so
 * deleting the row revokes them.
 */

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Sessions live for 30 days unless refreshed
pub const SESSION_TTL_DAYS: i64 = 30;

/// Sessions expiring within this window are extended on refresh
pub const SESSION_RENEW_WINDOW_HOURS: i64 = 24;

/// A persisted login session
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    /// `User-Agent` header of the login request
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// True when the session should be extended on refresh
    pub fn needs_renewal(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now <= Duration::hours(SESSION_RENEW_WINDOW_HOURS)
    }
}

/// Expiry for a session created or renewed at `now`
pub fn session_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(SESSION_TTL_DAYS)
}

/// Create a new session for a user
pub async fn create_session(
    pool: &SqlitePool,
    user_id: Uuid,
    user_agent: Option<String>,
) -> Result<Session, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, user_agent, created_at, expires_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, user_agent, created_at, expires_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(user_agent)
    .bind(now)
    .bind(session_expiry(now))
    .fetch_one(pool)
    .await
}

/// Get session by ID
pub async fn get_session(pool: &SqlitePool, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        "SELECT id, user_id, user_agent, created_at, expires_at FROM sessions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// All unexpired sessions of a user, newest first
pub async fn list_active_sessions(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Session>, sqlx::Error> {
    let now = Utc::now();
    let mut sessions = sqlx::query_as::<_, Session>(
        "SELECT id, user_id, user_agent, created_at, expires_at FROM sessions WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    sessions.retain(|session| !session.is_expired(now));
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sessions)
}

/// Push a session's expiry to `expires_at`
pub async fn extend_session(
    pool: &SqlitePool,
    id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
        .bind(expires_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a session. Returns whether a row was removed.
pub async fn delete_session(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a session only if it belongs to `user_id`
pub async fn delete_user_session(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every session of a user. Returns the number removed.
pub async fn delete_sessions_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
