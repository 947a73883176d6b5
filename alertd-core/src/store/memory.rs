use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use super::{AlertStore, StoreError};
use crate::model::{Alert, PendingAlert};

/// Process-local store. Records are kept in insertion order, which is also
/// id order.
#[derive(Debug)]
pub struct MemoryAlertStore {
    alerts: RwLock<Vec<Alert>>,
    next_id: AtomicI64,
}

impl Default for MemoryAlertStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    async fn find_where<F>(&self, predicate: F) -> Vec<Alert>
    where
        F: Fn(&Alert) -> bool,
    {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|alert| predicate(alert))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn insert(&self, alert: PendingAlert) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = alert.with_id(id);
        alerts.push(stored.clone());
        debug!("Inserted alert {} into memory store", id);
        Ok(stored)
    }

    async fn update(&self, alert: &Alert) -> Result<(), StoreError> {
        let mut alerts = self.alerts.write().await;
        let existing = alerts
            .iter_mut()
            .find(|stored| stored.id == alert.id)
            .ok_or(StoreError::NotFound(alert.id))?;
        existing.status = alert.status;
        existing.sent_at = alert.sent_at;
        existing.error_message = alert.error_message.clone();
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.alerts.read().await.clone())
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<Alert>, StoreError> {
        Ok(self.find_where(|alert| alert.status.as_str() == status).await)
    }

    async fn find_by_target_service(&self, target: &str) -> Result<Vec<Alert>, StoreError> {
        Ok(self.find_where(|alert| alert.target_service == target).await)
    }

    async fn find_by_severity(&self, severity: &str) -> Result<Vec<Alert>, StoreError> {
        Ok(self.find_where(|alert| alert.severity.as_str() == severity).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertStatus, NewAlert, Severity};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn pending(title: &str, severity: Severity, target: &str) -> PendingAlert {
        PendingAlert::new(NewAlert::new(title, "body", severity, target), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryAlertStore::new();
        let first = store.insert(pending("a", Severity::Info, "svc")).await.unwrap();
        let second = store.insert(pending("b", Severity::Info, "svc")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, AlertStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_only_touches_outcome_fields() {
        let store = MemoryAlertStore::new();
        let mut alert = store.insert(pending("a", Severity::Error, "svc")).await.unwrap();
        let original_created = alert.created_at;

        alert.mark_failed("nope").unwrap();
        alert.title = "renamed".to_string();
        store.update(&alert).await.unwrap();

        let stored = store.find_all().await.unwrap().remove(0);
        assert_eq!(stored.status, AlertStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("nope"));
        assert_eq!(stored.title, "a");
        assert_eq!(stored.created_at, original_created);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemoryAlertStore::new();
        let ghost = pending("ghost", Severity::Info, "svc").with_id(42);
        assert_matches!(store.update(&ghost).await, Err(StoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_filters_are_case_sensitive() {
        let store = MemoryAlertStore::new();
        store.insert(pending("a", Severity::Critical, "Billing")).await.unwrap();

        assert_eq!(store.find_by_severity("CRITICAL").await.unwrap().len(), 1);
        assert!(store.find_by_severity("critical").await.unwrap().is_empty());
        assert_eq!(store.find_by_target_service("Billing").await.unwrap().len(), 1);
        assert!(store.find_by_target_service("billing").await.unwrap().is_empty());
        assert_eq!(store.find_by_status("PENDING").await.unwrap().len(), 1);
        assert!(store.find_by_status("Pending").await.unwrap().is_empty());
    }
}
