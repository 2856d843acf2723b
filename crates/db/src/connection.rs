use std::time::Duration;

use cloudpick_core::config::DatabaseConfig;
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;
use tracing::info;

use crate::migrations;

pub type DbPool = sqlx::SqlitePool;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    // Every connection to an in-memory database gets its own empty schema.
    let max_connections = if is_in_memory(database_url) { 1 } else { max_connections.max(1) };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Connects with the configured settings and brings the schema up to date.
pub async fn open(config: &DatabaseConfig) -> Result<DbPool, OpenError> {
    let pool = connect_with_settings(&config.url, config.max_connections, config.timeout_secs)
        .await
        .map_err(OpenError::Connect)?;
    info!(
        event_name = "db.pool.connected",
        max_connections = config.max_connections,
        "database connection established"
    );

    migrations::run_pending(&pool).await.map_err(OpenError::Migrate)?;
    info!(event_name = "db.pool.migrations_applied", "database migrations applied");

    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url == ":memory:"
        || database_url.starts_with("sqlite::memory:")
        || database_url.contains("mode=memory")
}
