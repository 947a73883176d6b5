use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Notifier, NotifyError};
use crate::model::Severity;

/// Notifier with a preset outcome, for deterministic dispatch in tests and
/// dry runs. Counts how often it was called.
#[derive(Debug)]
pub struct StaticNotifier {
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticNotifier {
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for StaticNotifier {
    async fn send(
        &self,
        _target_service: &str,
        _title: &str,
        _severity: Severity,
    ) -> Result<(), NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(reason) => Err(NotifyError::Unreachable(reason.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}
