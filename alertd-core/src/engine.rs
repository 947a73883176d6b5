//! Alert lifecycle: intake, persistence, one dispatch attempt, outcome.
//!
//! `create_alert` writes twice. The first write stores the alert as PENDING
//! and gives it an id; the second records SENT or FAILED once the notifier
//! has answered. A reader running between the two writes sees the PENDING
//! record. Dispatch failures are stored on the alert, never returned as
//! errors; only input that breaks a store bound and store failures reach
//! the caller.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::model::{Alert, InvalidAlert, NewAlert, PendingAlert, TransitionError};
use crate::notifier::Notifier;
use crate::store::{AlertStore, StoreError};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Invalid(#[from] InvalidAlert),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Upper bound on a single notifier call. `None` waits indefinitely.
    pub dispatch_timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct AlertEngine {
    store: Arc<dyn AlertStore>,
    notifier: Arc<dyn Notifier>,
    config: EngineConfig,
}

impl AlertEngine {
    pub fn new(store: Arc<dyn AlertStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn notifier_name(&self) -> &str {
        self.notifier.name()
    }

    /// Store a new alert, dispatch it once and record the outcome.
    ///
    /// The returned alert is always SENT or FAILED.
    pub async fn create_alert(&self, input: NewAlert) -> Result<Alert, EngineError> {
        input.check()?;
        let pending = PendingAlert::new(input, Utc::now());
        let mut alert = self.store.insert(pending).await?;
        info!("Created alert: {} for service: {}", alert.id, alert.target_service);

        match self.dispatch(&alert).await {
            Ok(()) => {
                alert.mark_sent(Utc::now())?;
                info!("Alert {} sent to {} via {}", alert.id, alert.target_service, self.notifier.name());
            }
            Err(reason) => {
                error!("Failed to send alert {}: {}", alert.id, reason);
                alert.mark_failed(&reason)?;
            }
        }

        self.store.update(&alert).await?;
        Ok(alert)
    }

    async fn dispatch(&self, alert: &Alert) -> Result<(), String> {
        let send = self
            .notifier
            .send(&alert.target_service, &alert.title, alert.severity);

        match self.config.dispatch_timeout {
            Some(limit) => match tokio::time::timeout(limit, send).await {
                Ok(outcome) => outcome.map_err(|e| e.to_string()),
                Err(_) => Err(format!("dispatch timed out after {:?}", limit)),
            },
            None => send.await.map_err(|e| e.to_string()),
        }
    }

    pub async fn get_all_alerts(&self) -> Result<Vec<Alert>, EngineError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_alerts_by_status(&self, status: &str) -> Result<Vec<Alert>, EngineError> {
        debug!("Listing alerts with status {:?}", status);
        Ok(self.store.find_by_status(status).await?)
    }

    pub async fn get_alerts_by_service(&self, service: &str) -> Result<Vec<Alert>, EngineError> {
        debug!("Listing alerts for service {:?}", service);
        Ok(self.store.find_by_target_service(service).await?)
    }

    pub async fn get_alerts_by_severity(&self, severity: &str) -> Result<Vec<Alert>, EngineError> {
        debug!("Listing alerts with severity {:?}", severity);
        Ok(self.store.find_by_severity(severity).await?)
    }
}
