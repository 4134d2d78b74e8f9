//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and ensures the
//! `subscriptions` table and its indexes exist. Schema creation is
//! idempotent and safe to run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// URL for a private in-memory database
pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// SQLite lock wait before a statement fails with SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool sizing
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(5 * 60),
        }
    }
}

/// Initialize database connection and create tables if needed
///
/// `database` is either a `sqlite:` URL or a filesystem path.
pub async fn init_database(database: &str, settings: &PoolSettings) -> Result<SqlitePool> {
    if is_memory_url(database) {
        return open_memory(database).await;
    }

    let url = if database.starts_with("sqlite:") {
        database.to_string()
    } else {
        let db_path = Path::new(database);
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        format!("sqlite://{}?mode=rwc", db_path.display())
    };

    let options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .max_lifetime(settings.max_lifetime)
        .connect_with(options)
        .await?;

    info!("Opened database: {}", database);

    create_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database on a single pinned connection
///
/// Every SQLite in-memory connection is its own database, so the pool is
/// limited to one connection that is never recycled.
pub async fn init_memory_database() -> Result<SqlitePool> {
    open_memory(MEMORY_DATABASE_URL).await
}

async fn open_memory(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

fn is_memory_url(database: &str) -> bool {
    database == MEMORY_DATABASE_URL || database.contains("mode=memory")
}

/// Create the subscriptions table and indexes
///
/// Months are stored as ordinals (`year * 12 + month - 1`).
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id TEXT PRIMARY KEY,
            service_name TEXT NOT NULL CHECK (length(service_name) > 0),
            price INTEGER NOT NULL CHECK (price >= 0 AND price <= 2147483647),
            user_id TEXT NOT NULL CHECK (length(user_id) = 36),
            start_month INTEGER NOT NULL,
            end_month INTEGER,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL,
            deleted_at TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_subscriptions_user_id ON subscriptions(user_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_subscriptions_service_name ON subscriptions(service_name)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_subscriptions_start_month ON subscriptions(start_month)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
