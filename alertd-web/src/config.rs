use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub port: u16,
    pub database_url: String,
    /// `log` or `webhook`
    pub notifier: String,
    pub webhook_url: Option<String>,
    pub notifier_timeout_secs: u64,
    /// Engine-level bound on a dispatch; unset means wait for the notifier.
    pub dispatch_timeout_secs: Option<u64>,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub max_body_size: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("alertd");
        let db_path = data_dir.join("alertd.db");

        Self {
            port: 3000,
            database_url: format!("sqlite://{}", db_path.to_string_lossy()),
            notifier: "log".to_string(),
            webhook_url: None,
            notifier_timeout_secs: 10,
            dispatch_timeout_secs: None,
            cors_origins: Vec::new(),
            max_body_size: 64 * 1024, // 64KB
        }
    }
}

impl WebConfig {
    /// Defaults overridden by the process environment (and `.env`, if present).
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let port = ["ALERTD_PORT", "PORT"]
            .into_iter()
            .find_map(|name| lookup(name).map(|value| (name, value)));
        if let Some((name, port)) = port {
            config.port = parse_var(name, &port)?;
        }

        // ALERTD_DATABASE_URL wins over the generic DATABASE_URL
        if let Some(db_url) = lookup("ALERTD_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            config.database_url = db_url;
        }

        if let Some(notifier) = lookup("ALERTD_NOTIFIER") {
            config.notifier = notifier.trim().to_lowercase();
        }

        if let Some(url) = lookup("ALERTD_WEBHOOK_URL") {
            config.webhook_url = Some(url).filter(|u| !u.trim().is_empty());
        }

        if let Some(timeout) = lookup("ALERTD_NOTIFIER_TIMEOUT_SECS") {
            config.notifier_timeout_secs = parse_var("ALERTD_NOTIFIER_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(timeout) = lookup("ALERTD_DISPATCH_TIMEOUT_SECS") {
            config.dispatch_timeout_secs = Some(parse_var("ALERTD_DISPATCH_TIMEOUT_SECS", &timeout)?);
        }

        if let Some(origins) = lookup("ALERTD_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(max_size) = lookup("ALERTD_MAX_BODY_SIZE") {
            config.max_body_size = parse_var("ALERTD_MAX_BODY_SIZE", &max_size)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.notifier == "webhook" && self.webhook_url.is_none() {
            bail!("ALERTD_NOTIFIER=webhook requires ALERTD_WEBHOOK_URL");
        }
        if self.notifier_timeout_secs == 0 {
            bail!("ALERTD_NOTIFIER_TIMEOUT_SECS must be greater than zero");
        }
        if self.dispatch_timeout_secs == Some(0) {
            bail!("ALERTD_DISPATCH_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn notifier_timeout(&self) -> Duration {
        Duration::from_secs(self.notifier_timeout_secs)
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_var<T>(name: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: '{}'", name, value))
}
