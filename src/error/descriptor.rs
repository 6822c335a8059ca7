use thiserror::Error;

use super::kind::ErrorKind;

/// Normalized description of a failed call.
///
/// Values are immutable once built; the `with_*` methods consume `self`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    user_message: String,
    status_code: Option<u16>,
    retryable: bool,
    retry_after: Option<u64>,
}

impl ApiError {
    /// Creates an error of the given kind with the kind's default user message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            user_message: kind.default_user_message().to_string(),
            status_code: None,
            retryable: kind.is_retryable(),
            retry_after: None,
        }
    }

    /// Replaces the human-facing message.
    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = user_message.into();
        self
    }

    /// Attaches the HTTP status the failure was observed with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    /// Attaches an advisory `Retry-After` value in seconds.
    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after = seconds;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Developer-facing description of the underlying cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Whether the operation that produced this error may be attempted again.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Server-suggested wait in seconds. Advisory only.
    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }
}
