use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const HEALTHY_STATUSES: &[&str] = &["healthy", "ok"];
const HEALTHY_COMPONENT_STATUSES: &[&str] = &["healthy", "connected", "ok"];
const NOT_REPORTED: &str = "unknown";

/// Body returned by the liveness endpoint. Unlisted fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: Option<String>,
    pub database: Option<String>,
    pub redis: Option<String>,
    pub version: Option<String>,
    pub uptime: Option<serde_json::Value>,
}

impl HealthReport {
    /// Sub-component statuses, with `unknown` for components not reported.
    pub fn components(&self) -> BTreeMap<String, String> {
        [("database", &self.database), ("redis", &self.redis)]
            .into_iter()
            .map(|(name, status)| {
                let status = status.as_deref().unwrap_or(NOT_REPORTED);
                (name.to_string(), status.to_string())
            })
            .collect()
    }
}

/// Whether a report describes a fully working service.
///
/// The top-level status must be healthy/ok and every reported component
/// healthy/connected/ok. A missing component counts as not reported, not broken.
pub fn evaluate_health(report: &HealthReport) -> bool {
    let top_level = HEALTHY_STATUSES
        .iter()
        .any(|ok| report.status.trim().eq_ignore_ascii_case(ok));
    top_level
        && report
            .components()
            .values()
            .all(|status| component_ok(status))
}

fn component_ok(status: &str) -> bool {
    let status = status.trim();
    status.eq_ignore_ascii_case(NOT_REPORTED)
        || HEALTHY_COMPONENT_STATUSES
            .iter()
            .any(|ok| status.eq_ignore_ascii_case(ok))
}

/// One evaluated poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub healthy: bool,
    pub components: BTreeMap<String, String>,
    pub observed_at: DateTime<Utc>,
    pub latency_ms: u64,
}

impl HealthSnapshot {
    pub fn from_report(report: &HealthReport, latency_ms: u64) -> Self {
        Self {
            healthy: evaluate_health(report),
            components: report.components(),
            observed_at: Utc::now(),
            latency_ms,
        }
    }
}

/// Health as tracked by a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Nothing observed yet. Never re-entered.
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
}

impl HealthState {
    /// Boolean used for transition detection; `Unknown` counts as healthy.
    pub fn assumed_healthy(self) -> bool {
        !matches!(self, Self::Unhealthy)
    }
}

impl From<bool> for HealthState {
    fn from(healthy: bool) -> Self {
        if healthy {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}
