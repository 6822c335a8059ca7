use mockito::Matcher;

use super::{
    check_id, HealthService, JobList, JobListQuery, JobService, JobStatus, ResultsOptions,
    ResultsService, ScrapeRequest, SortOrder,
};
use crate::{
    backoff::RetryPolicy,
    client::{ApiClient, ClientConfig},
    error::ErrorKind,
    health::{evaluate_health, HealthMonitor, HealthState, MonitorConfig},
};

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.url()).retry(RetryPolicy::default().with_delays(1, 5)))
        .expect("client")
}

#[test]
fn job_list_query_only_sends_set_parameters() {
    assert!(JobListQuery::default().to_query().is_empty());

    let query = JobListQuery {
        status: Some(JobStatus::Running),
        limit: Some(20),
        offset: Some(40),
        sort_by: Some("created_at".to_string()),
        sort_order: Some(SortOrder::Asc),
    };
    assert_eq!(
        query.to_query(),
        vec![
            ("status", "running".to_string()),
            ("limit", "20".to_string()),
            ("offset", "40".to_string()),
            ("sort_by", "created_at".to_string()),
            ("sort_order", "asc".to_string()),
        ]
    );
}

#[test]
fn ids_that_escape_the_path_are_rejected() {
    assert!(check_id("3f2c-41aa_9.b").is_ok());
    for id in ["", "..", "a/b", "a?b=c", "job id"] {
        let err = check_id(id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{id}");
    }
}

#[test]
fn scrape_request_flattens_extra_options() {
    let request = ScrapeRequest::new("https://example.com")
        .wait_for("#content")
        .option("proxy", serde_json::json!("eu"));
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"url": "https://example.com", "wait_for": "#content", "proxy": "eu"})
    );
}

#[test]
fn unrecognized_statuses_do_not_break_the_list() {
    let list: JobList = serde_json::from_str(
        r#"{"jobs": [
            {"job_id": "a1", "status": "archived"},
            {"job_id": "b2", "status": "canceled"}
        ], "total": 2}"#,
    )
    .unwrap();

    assert_eq!(list.jobs[0].status, JobStatus::Unknown);
    assert!(!list.jobs[0].status.is_terminal());
    assert_eq!(list.jobs[1].status, JobStatus::Cancelled);
}

#[tokio::test]
async fn lists_jobs_with_filters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/jobs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "completed".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("sort_order".into(), "desc".into()),
            Matcher::Regex(r"_t=\d+".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"jobs": [
                {"job_id": "a1", "url": "https://a.example", "status": "completed"},
                {"id": "b2", "url": "https://b.example", "status": "completed", "extra": 1}
            ], "total": 7}"#,
        )
        .create_async()
        .await;

    let jobs = JobService::new(client_for(&server));
    let list = jobs
        .list_jobs(&JobListQuery {
            status: Some(JobStatus::Completed),
            limit: Some(2),
            sort_order: Some(SortOrder::Desc),
            ..JobListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(list.total, 7);
    assert_eq!(list.jobs.len(), 2);
    assert_eq!(list.jobs[1].job_id, "b2");
    assert!(list.jobs.iter().all(|job| job.status.is_terminal()));
    mock.assert_async().await;
}

#[tokio::test]
async fn job_creation_is_never_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/scrape")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let jobs = JobService::new(client_for(&server));
    let err = jobs
        .create_job(&ScrapeRequest::new("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    mock.assert_async().await;
}

#[tokio::test]
async fn fetching_a_job_retries_transient_failures() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/scrape/j-42")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let jobs = JobService::new(client_for(&server));
    let err = jobs.get_job("j-42").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    mock.assert_async().await;
}

#[tokio::test]
async fn cancelling_accepts_any_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/v1/scrape/j-42")
        .with_status(200)
        .with_body(r#"{"message": "Job cancelled"}"#)
        .create_async()
        .await;

    let jobs = JobService::new(client_for(&server));
    jobs.cancel_job("j-42").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn results_pass_include_flags() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/results/j-42")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("include_html".into(), "true".into()),
            Matcher::UrlEncoded("include_screenshot".into(), "false".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"job_id": "j-42", "url": "https://example.com", "status": "completed",
                "data": {"title": "Example"}, "html": "<html></html>"}"#,
        )
        .create_async()
        .await;

    let results = ResultsService::new(client_for(&server));
    let result = results
        .get_results(
            "j-42",
            ResultsOptions {
                include_html: true,
                include_screenshot: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(result.data["title"], "Example");
    assert_eq!(result.html.as_deref(), Some("<html></html>"));
    assert!(result.screenshot.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn health_endpoint_with_broken_component_evaluates_unhealthy() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "healthy", "database": "connected", "redis": "disconnected"}"#)
        .create_async()
        .await;

    let health = HealthService::new(client_for(&server));
    let report = health.check().await.unwrap();
    assert!(!evaluate_health(&report));
}

#[tokio::test]
async fn monitor_drives_the_versioned_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/health")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "ok", "version": "2.1.0"}"#)
        .create_async()
        .await;

    let monitor = HealthMonitor::new(HealthService::versioned(client_for(&server)));
    let snapshot = monitor
        .check_once(&MonitorConfig::new(std::time::Duration::from_secs(30)))
        .await
        .expect("snapshot");

    assert!(snapshot.healthy);
    assert_eq!(monitor.state(), HealthState::Healthy);
    mock.assert_async().await;
}
