use secrecy::SecretString;

use crate::backoff::RetryPolicy;

pub(crate) const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for an [`ApiClient`](super::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Ceiling for every outbound call, in seconds.
    pub timeout_seconds: u64,
    /// Optional bearer token.
    pub api_key: Option<SecretString>,
    /// Policy used by retrying calls that do not pass their own.
    pub retry: RetryPolicy,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            api_key: None,
            retry: RetryPolicy::default(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }
}
