use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::model::Severity;

mod fixed;
mod log;
#[cfg(feature = "webhook")]
pub mod webhook;

pub use fixed::StaticNotifier;
pub use log::LogNotifier;
#[cfg(feature = "webhook")]
pub use webhook::WebhookNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[cfg(feature = "webhook")]
    #[error("request to target failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("target rejected alert: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    /// Free-form failure reason, stored verbatim.
    #[error("{0}")]
    Unreachable(String),
    #[error("notifier not supported: {0}")]
    UnsupportedKind(String),
    #[error("notifier misconfigured: {0}")]
    Misconfigured(String),
}

/// Delivers an alert to the service it targets.
///
/// Any `Err` is a failed dispatch; its `Display` text becomes the alert's
/// recorded error message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        target_service: &str,
        title: &str,
        severity: Severity,
    ) -> Result<(), NotifyError>;

    fn name(&self) -> &str;
}

/// Build a notifier by name. `webhook_url` is required for `"webhook"`.
#[cfg_attr(not(feature = "webhook"), allow(unused_variables))]
pub fn create_notifier(
    kind: &str,
    webhook_url: Option<&str>,
    timeout: Duration,
) -> Result<Box<dyn Notifier>, NotifyError> {
    info!("Creating notifier: {}", kind);
    match kind.to_lowercase().as_str() {
        "log" => {
            debug!("Initializing log-only notifier");
            Ok(Box::new(LogNotifier::new()))
        }
        #[cfg(feature = "webhook")]
        "webhook" => {
            let url = webhook_url.ok_or_else(|| {
                NotifyError::Misconfigured("webhook notifier requires a base URL".to_string())
            })?;
            debug!("Initializing webhook notifier for {} (timeout {:?})", url, timeout);
            Ok(Box::new(WebhookNotifier::new(url, timeout)?))
        }
        _ => {
            error!("Unsupported notifier: {}", kind);
            Err(NotifyError::UnsupportedKind(kind.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_create_log_notifier() {
        let notifier = create_notifier("log", None, Duration::from_secs(1)).unwrap();
        assert_eq!(notifier.name(), "log");

        let notifier = create_notifier("LOG", None, Duration::from_secs(1)).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn test_create_webhook_notifier_requires_url() {
        assert_matches!(
            create_notifier("webhook", None, Duration::from_secs(1)).err(),
            Some(NotifyError::Misconfigured(_))
        );

        let notifier =
            create_notifier("webhook", Some("http://localhost:9000/hooks"), Duration::from_secs(1))
                .unwrap();
        assert_eq!(notifier.name(), "webhook");
    }

    #[test]
    fn test_unknown_notifier_is_rejected() {
        assert_matches!(
            create_notifier("carrier-pigeon", None, Duration::from_secs(1)).err(),
            Some(NotifyError::UnsupportedKind(kind)) if kind == "carrier-pigeon"
        );
    }

    #[test]
    fn test_unreachable_reason_displays_verbatim() {
        assert_eq!(
            NotifyError::Unreachable("connection refused".to_string()).to_string(),
            "connection refused"
        );
    }
}
