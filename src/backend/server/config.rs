/**
 * Database Setup
 *
 * Opens the SQLite pool named by `DATABASE_URL` and brings the schema up to
 * date with the migrations in `migrations/`.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::backend::error::BackendError;

/// Connect to the database, creating the file if needed
///
/// Foreign keys are switched on for every connection so deleting a user
/// cascades to their sessions and codes.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, BackendError> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to `:memory:` is its own database, so keep exactly one alive
    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            e
        })?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Apply pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), BackendError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Connect and migrate in one step
pub async fn load_database(database_url: &str) -> Result<SqlitePool, BackendError> {
    let pool = connect_database(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
