use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub status: HealthState,
    pub latency_ms: u64,
    pub error: Option<String>,
}

/// Body of `GET /health`. The notifier is reported by name only; it is
/// never called from here.
#[derive(Serialize, Deserialize, Debug)]
pub struct HealthReport {
    pub status: HealthState,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub notifier: String,
    pub services: BTreeMap<String, ComponentHealth>,
}

impl HealthReport {
    fn overall(services: &BTreeMap<String, ComponentHealth>) -> HealthState {
        if services.values().all(|c| c.status == HealthState::Healthy) {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let database = match state.db.ping().await {
        Ok(latency) => ComponentHealth {
            status: HealthState::Healthy,
            latency_ms: latency.as_millis() as u64,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Database health probe failed: {}", e);
            ComponentHealth {
                status: HealthState::Unhealthy,
                latency_ms: 0,
                error: Some(e.to_string()),
            }
        }
    };

    let mut services = BTreeMap::new();
    services.insert("database".to_string(), database);

    Json(HealthReport {
        status: HealthReport::overall(&services),
        timestamp: Utc::now(),
        version: crate::VERSION.to_string(),
        notifier: state.engine.notifier_name().to_string(),
        services,
    })
}
