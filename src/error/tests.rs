use rstest::rstest;

use super::{classify, ApiError, ErrorKind, Failure};

fn response(status: u16, body: Option<&str>) -> Failure {
    Failure::Response {
        status,
        body: body.map(str::to_string),
        retry_after: None,
    }
}

#[rstest]
#[case(400)]
#[case(401)]
#[case(403)]
#[case(404)]
#[case(409)]
#[case(422)]
#[case(429)]
#[case(499)]
fn client_errors_are_validation_and_final(#[case] status: u16) {
    let err = classify(response(status, None));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!err.is_retryable());
    assert_eq!(err.status_code(), Some(status));
    assert_eq!(err.user_message(), "Validation error");
}

#[rstest]
#[case(408)]
#[case(504)]
fn gateway_and_request_timeouts_are_retryable_timeouts(#[case] status: u16) {
    let err = classify(response(status, None));
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retryable());
}

#[rstest]
#[case(500)]
#[case(502)]
#[case(503)]
#[case(599)]
fn server_errors_are_retryable(#[case] status: u16) {
    let err = classify(response(status, Some("<html>oops</html>")));
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.is_retryable());
    assert_eq!(
        err.user_message(),
        "A server error occurred. Please try again later."
    );
}

#[rstest]
#[case(r#"{"error": "url is required"}"#, "url is required")]
#[case(r#"{"detail": "Job not found"}"#, "Job not found")]
#[case(
    r#"{"detail": [{"loc": ["body", "url"], "msg": "invalid url", "type": "value_error"}]}"#,
    "invalid url"
)]
#[case(r#"{"error": "   "}"#, "Validation error")]
#[case(r#"{"error": "", "detail": "bad url"}"#, "bad url")]
#[case("not json", "Validation error")]
fn validation_user_message_prefers_body_detail(#[case] body: &str, #[case] expected: &str) {
    let err = classify(response(422, Some(body)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(), expected);
}

#[test]
fn retry_after_is_carried_through() {
    let err = classify(Failure::Response {
        status: 503,
        body: None,
        retry_after: Some(7),
    });
    assert_eq!(err.retry_after(), Some(7));
    assert!(err.is_retryable());
}

#[test]
fn missing_response_is_network() {
    let err = classify(Failure::NoResponse("connection refused".to_string()));
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_retryable());
    assert_eq!(err.status_code(), None);
    assert_eq!(
        err.user_message(),
        "Unable to connect to the server. Please check your internet connection."
    );
}

#[rstest]
#[case("timeout of 30000ms exceeded")]
#[case("operation Timed Out")]
#[case("ETIMEDOUT")]
#[case("ECONNABORTED while reading")]
fn timeout_messages_are_timeouts(#[case] message: &str) {
    let err = classify(message);
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retryable());
}

#[rstest]
#[case("something odd happened")]
#[case("")]
fn unrecognized_messages_are_unknown(#[case] message: &str) {
    let err = classify(message);
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert!(!err.is_retryable());
}

#[test]
fn decode_failures_are_unknown() {
    let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = classify(decode);
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert!(!err.is_retryable());
}

#[test]
fn unexpected_status_is_unknown() {
    let err = classify(response(302, None));
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert_eq!(err.status_code(), Some(302));
}

#[test]
fn classified_errors_pass_through_unchanged() {
    let original = ApiError::new(ErrorKind::Server, "HTTP 502").with_status(502);
    assert_eq!(classify(original.clone()), original);
}

#[test]
fn display_includes_kind_and_message() {
    let err = ApiError::new(ErrorKind::Network, "dns failure");
    assert_eq!(err.to_string(), "network error: dns failure");
}

#[tokio::test]
async fn refused_connection_classifies_as_network() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap_err();
    let classified = classify(err);
    assert_eq!(classified.kind(), ErrorKind::Network);
    assert!(classified.is_retryable());
}
