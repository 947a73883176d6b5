use async_trait::async_trait;
use tracing::info;

use super::{Notifier, NotifyError};
use crate::model::Severity;

/// Records the dispatch in the service log and reports success. Used when
/// no outbound transport is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        target_service: &str,
        title: &str,
        severity: Severity,
    ) -> Result<(), NotifyError> {
        info!(
            "Sending alert to service: {} - Title: {}, Severity: {}",
            target_service, title, severity
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier::new();
        assert!(notifier.send("billing", "DB down", Severity::Critical).await.is_ok());
    }
}
