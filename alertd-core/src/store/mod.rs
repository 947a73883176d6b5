// Alert persistence contract

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Alert, PendingAlert};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryAlertStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAlertStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[cfg(feature = "sqlite")]
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Alert {0} not found")]
    NotFound(i64),
    #[error("Corrupt alert record: {0}")]
    Corrupt(String),
}

/// Holds Alert records. Lookups are exact, case-sensitive matches on the
/// stored text of the field and return records in id order.
///
/// `insert` and `update` are independent writes; callers must not assume
/// both land together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, alert: PendingAlert) -> Result<Alert, StoreError>;
    /// Overwrite the mutable fields of an existing record.
    async fn update(&self, alert: &Alert) -> Result<(), StoreError>;
    async fn find_all(&self) -> Result<Vec<Alert>, StoreError>;
    async fn find_by_status(&self, status: &str) -> Result<Vec<Alert>, StoreError>;
    async fn find_by_target_service(&self, target: &str) -> Result<Vec<Alert>, StoreError>;
    async fn find_by_severity(&self, severity: &str) -> Result<Vec<Alert>, StoreError>;
}
