use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid base URL {0}")]
    InvalidBaseUrl(String),
    #[error("timeout_seconds must be at least 1")]
    InvalidTimeout,
    #[error("invalid retry policy: {0}")]
    InvalidPolicy(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
