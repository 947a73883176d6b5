use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Notifier, NotifyError};
use crate::model::Severity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    target_service: &'a str,
    title: &'a str,
    severity: Severity,
    sent_at: String,
}

/// POSTs each alert as JSON to `{base_url}/{target_service}`.
pub struct WebhookNotifier {
    client: Client,
    base_url: Url,
}

impl WebhookNotifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| NotifyError::Misconfigured(format!("invalid webhook URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(NotifyError::Misconfigured(format!(
                "webhook URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint_for(&self, target_service: &str) -> Result<Url, NotifyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NotifyError::Misconfigured(format!("webhook URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(target_service);
        Ok(url)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(
        &self,
        target_service: &str,
        title: &str,
        severity: Severity,
    ) -> Result<(), NotifyError> {
        let url = self.endpoint_for(target_service)?;
        debug!("Posting alert '{}' to {}", title, url);

        let payload = WebhookPayload {
            target_service,
            title,
            severity,
            sent_at: Utc::now().to_rfc3339(),
        };

        let response = self.client.post(url.clone()).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Webhook {} answered HTTP {}", url, status);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
