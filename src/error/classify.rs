use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use super::{descriptor::ApiError, kind::ErrorKind};

const TIMEOUT_SIGNATURE: &str = r"timeout|timed\s*out|etimedout|econnaborted";

static TIMEOUT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Raw failure shapes observed before classification.
#[derive(Debug)]
pub enum Failure {
    /// A response arrived with a non-success status.
    Response {
        status: u16,
        body: Option<String>,
        retry_after: Option<u64>,
    },
    /// An error raised by the HTTP transport.
    Transport(reqwest::Error),
    /// The request never produced a response (refused, DNS, aborted).
    NoResponse(String),
    /// A bare message with no further structure.
    Message(String),
    /// A successful response whose body could not be decoded.
    Decode(serde_json::Error),
    /// A failure that has already been classified.
    Classified(ApiError),
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::Transport(err)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::Decode(err)
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        Failure::Classified(err)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::Message(message.to_string())
    }
}

/// Maps any raw failure to an [`ApiError`]. Never panics.
///
/// Rules apply in order: status-bearing responses, missing responses,
/// timeout-looking messages, then `unknown`.
pub fn classify(failure: impl Into<Failure>) -> ApiError {
    match failure.into() {
        Failure::Classified(err) => err,
        Failure::Response {
            status,
            body,
            retry_after,
        } => from_status(status, body.as_deref()).with_retry_after(retry_after),
        Failure::Transport(err) => from_transport(&err),
        Failure::NoResponse(message) => ApiError::new(ErrorKind::Network, message),
        Failure::Message(message) => from_message(message),
        Failure::Decode(err) => {
            ApiError::new(ErrorKind::Unknown, format!("invalid response body: {err}"))
        }
    }
}

fn from_status(status: u16, body: Option<&str>) -> ApiError {
    let detail = body.and_then(body_detail);
    let message = match &detail {
        Some(detail) => format!("HTTP {status}: {detail}"),
        None => format!("HTTP {status}"),
    };

    let err = match status {
        408 | 504 => ApiError::new(ErrorKind::Timeout, message),
        400..=499 => {
            let err = ApiError::new(ErrorKind::Validation, message);
            match detail {
                Some(detail) => err.with_user_message(detail),
                None => err,
            }
        }
        500..=599 => ApiError::new(ErrorKind::Server, message),
        _ => ApiError::new(ErrorKind::Unknown, message),
    };
    err.with_status(status)
}

fn from_transport(err: &reqwest::Error) -> ApiError {
    if let Some(status) = err.status() {
        return from_status(status.as_u16(), None);
    }
    if err.is_timeout() {
        return ApiError::new(ErrorKind::Timeout, err.to_string());
    }
    if err.is_connect() || err.is_request() || err.is_body() || err.is_redirect() {
        return ApiError::new(ErrorKind::Network, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ErrorKind::Unknown, err.to_string());
    }
    from_message(err.to_string())
}

fn from_message(message: String) -> ApiError {
    if looks_like_timeout(&message) {
        ApiError::new(ErrorKind::Timeout, message)
    } else {
        ApiError::new(ErrorKind::Unknown, message)
    }
}

fn looks_like_timeout(message: &str) -> bool {
    TIMEOUT_REGEX
        .get_or_init(|| {
            RegexBuilder::new(TIMEOUT_SIGNATURE)
                .case_insensitive(true)
                .build()
                .ok()
        })
        .as_ref()
        .is_some_and(|re| re.is_match(message))
}

/// Pulls a human-readable reason out of a JSON error body.
///
/// Looks at a non-blank `error`, then `detail` (string, or the first `msg` of a list).
fn body_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if let Some(error) = value.get("error").and_then(|v| v.as_str()).and_then(non_empty) {
        return Some(error);
    }
    match value.get("detail")? {
        serde_json::Value::String(detail) => non_empty(detail),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .and_then(non_empty),
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
