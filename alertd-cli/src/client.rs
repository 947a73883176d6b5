// HTTP client for a running alertd server

use alertd_core::{Alert, Severity};
use alertd_web::error_handling::ErrorResponse;
use alertd_web::validation::CreateAlertRequest;
use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertFilter {
    Status(String),
    Service(String),
    Severity(String),
}

impl AlertFilter {
    fn path(&self) -> (&'static str, &str) {
        match self {
            AlertFilter::Status(value) => ("status", value),
            AlertFilter::Service(value) => ("service", value),
            AlertFilter::Severity(value) => ("severity", value),
        }
    }
}

pub struct AlertClient {
    http: Client,
    base_url: String,
}

impl AlertClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_alert(
        &self,
        title: &str,
        message: &str,
        severity: Severity,
        target_service: &str,
    ) -> Result<Alert> {
        let request = CreateAlertRequest {
            title: title.to_string(),
            message: message.to_string(),
            severity: severity.to_string(),
            target_service: target_service.to_string(),
        };

        let url = format!("{}/api/alerts", self.base_url);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach alertd at {}", self.base_url))?;

        Self::decode(response).await
    }

    pub async fn list_alerts(&self, filter: Option<&AlertFilter>) -> Result<Vec<Alert>> {
        let mut url = reqwest::Url::parse(&format!("{}/api/alerts", self.base_url))
            .with_context(|| format!("Invalid server URL: {}", self.base_url))?;
        if let Some(filter) = filter {
            let (kind, value) = filter.path();
            url.path_segments_mut()
                .map_err(|_| anyhow::anyhow!("Invalid server URL: {}", self.base_url))?
                .push(kind)
                .push(value);
        }

        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to reach alertd at {}", self.base_url))?;

        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(error) => bail!("Server returned {} ({}): {}", status, error.code, error.message),
                Err(_) => bail!("Server returned {}: {}", status, text),
            }
        }

        response.json().await.context("Failed to parse server response")
    }
}

/// One-line summary of an alert for terminal output
pub fn format_alert(alert: &Alert) -> String {
    let mut line = format!(
        "#{} [{}] {} {}: {}",
        alert.id, alert.status, alert.severity, alert.target_service, alert.title
    );
    if let Some(error) = &alert.error_message {
        line.push_str(&format!(" (error: {})", error));
    }
    line
}
