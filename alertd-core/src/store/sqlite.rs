// SQLite-backed alert store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use super::{AlertStore, StoreError};
use crate::model::{Alert, PendingAlert};

const SELECT_ALERTS: &str = "SELECT id, title, message, severity, target_service, status, \
     created_at, sent_at, error_message FROM alerts";

#[derive(Debug, FromRow)]
struct AlertRow {
    id: i64,
    title: String,
    message: String,
    severity: String,
    target_service: String,
    status: String,
    created_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = StoreError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        let severity = row
            .severity
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("alert {}: {}", row.id, e)))?;
        let status = row
            .status
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("alert {}: {}", row.id, e)))?;

        Ok(Alert {
            id: row.id,
            title: row.title,
            message: row.message,
            severity,
            target_service: row.target_service,
            status,
            created_at: row.created_at,
            sent_at: row.sent_at,
            error_message: row.error_message,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqliteAlertStore {
    pool: SqlitePool,
}

impl SqliteAlertStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Private in-memory database with the schema applied.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Alert schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_where(&self, column: &str, value: &str) -> Result<Vec<Alert>, StoreError> {
        let sql = format!("{} WHERE {} = ? ORDER BY id", SELECT_ALERTS, column);
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        debug!("Matched {} alerts on {} = {:?}", rows.len(), column, value);
        rows.into_iter().map(Alert::try_from).collect()
    }
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    async fn insert(&self, alert: PendingAlert) -> Result<Alert, StoreError> {
        let result = sqlx::query(
            "INSERT INTO alerts (title, message, severity, target_service, status, created_at) \
             VALUES (?, ?, ?, ?, 'PENDING', ?)",
        )
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(alert.severity.as_str())
        .bind(&alert.target_service)
        .bind(alert.created_at)
        .execute(&self.pool)
        .await?;

        Ok(alert.with_id(result.last_insert_rowid()))
    }

    async fn update(&self, alert: &Alert) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE alerts SET status = ?, sent_at = ?, error_message = ? WHERE id = ?",
        )
        .bind(alert.status.as_str())
        .bind(alert.sent_at)
        .bind(&alert.error_message)
        .bind(alert.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(alert.id));
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Alert>, StoreError> {
        let sql = format!("{} ORDER BY id", SELECT_ALERTS);
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Alert::try_from).collect()
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<Alert>, StoreError> {
        self.fetch_where("status", status).await
    }

    async fn find_by_target_service(&self, target: &str) -> Result<Vec<Alert>, StoreError> {
        self.fetch_where("target_service", target).await
    }

    async fn find_by_severity(&self, severity: &str) -> Result<Vec<Alert>, StoreError> {
        self.fetch_where("severity", severity).await
    }
}
