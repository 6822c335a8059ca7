use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// No response was received (connection refused, DNS failure, aborted).
    Network,
    /// The request or the gateway timed out.
    Timeout,
    /// The server rejected the request itself (4xx other than 408).
    Validation,
    /// The server failed while handling a valid request (5xx).
    Server,
    /// Anything that could not be recognized.
    Unknown,
}

impl ErrorKind {
    /// Whether failures of this kind are transient.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Server)
    }

    /// Human-facing message used when nothing better is available.
    pub fn default_user_message(self) -> &'static str {
        match self {
            Self::Network => {
                "Unable to connect to the server. Please check your internet connection."
            }
            Self::Timeout => "The request timed out. Please try again.",
            Self::Validation => "Validation error",
            Self::Server => "A server error occurred. Please try again later.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
