use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::{backoff::RetryPolicy, client::ClientConfig};

const DEFAULT_HEALTH_INTERVAL_MS: u64 = 30_000;

/// Everything the client needs from its environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub api_key: Option<SecretString>,
    pub retry: RetryPolicy,
    pub health: HealthSettings,
}

/// Liveness polling settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    /// Time between two polls in milliseconds.
    pub interval_ms: u64,
    /// Policy wrapping each liveness call.
    pub probe: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            base_url: client.base_url,
            timeout_seconds: client.timeout_seconds,
            api_key: None,
            retry: RetryPolicy::default(),
            health: HealthSettings::default(),
        }
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_HEALTH_INTERVAL_MS,
            probe: RetryPolicy::fast(),
        }
    }
}

impl HealthSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Settings {
    /// Converts into the configuration an [`ApiClient`](crate::ApiClient) is built from.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            api_key: self.api_key.clone(),
            retry: self.retry.clone(),
            ..ClientConfig::default()
        }
    }
}
