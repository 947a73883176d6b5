use alertd_core::SqliteAlertStore;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        // An in-memory database lives and dies with its one connection
        if database_url.contains(":memory:") {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await
                .context("Failed to open in-memory database")?;
            return Ok(Self { pool });
        }

        // Ensure parent directory exists
        if let Some(db_path) = database_url.strip_prefix("sqlite://") {
            if let Some(parent) = std::path::Path::new(db_path).parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        info!("Opening database at {}", database_url);
        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // Configure connection pool with proper limits
        let pool = SqlitePoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .max_lifetime(Some(Duration::from_secs(30 * 60))) // 30 minutes
            .idle_timeout(Some(Duration::from_secs(10 * 60))) // 10 minutes
            .acquire_timeout(Duration::from_secs(30))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .context("Failed to create database connection pool")?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        self.alert_store().migrate().await?;
        Ok(())
    }

    /// Round-trip a trivial query and report how long it took.
    pub async fn ping(&self) -> Result<Duration, sqlx::Error> {
        let started = Instant::now();
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(started.elapsed())
    }

    pub fn alert_store(&self) -> SqliteAlertStore {
        SqliteAlertStore::new(self.pool.clone())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_database_is_created_with_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("alertd.db");
        let url = format!("sqlite://{}", path.display());

        let db = Database::new(&url).await.unwrap();
        db.migrate().await.unwrap();

        assert!(path.exists());
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM alerts")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_ping_fails_once_pool_is_closed() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        assert!(db.ping().await.is_ok());

        db.pool().close().await;
        assert!(db.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }
}
