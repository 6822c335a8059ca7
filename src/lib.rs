//! Resilient client for the scraping job service.
//!
//! Every call goes through [`ApiClient`], which turns transport failures,
//! HTTP error statuses and undecodable bodies into a classified
//! [`ApiError`]. Idempotent calls are retried with exponential backoff
//! according to a [`RetryPolicy`]; [`HealthMonitor`] polls the liveness
//! endpoint and reports only when health flips.
//!
//! ```no_run
//! use scrape_client::{ApiClient, ClientConfig, JobListQuery, JobService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ClientConfig::new("http://localhost:8000"))?;
//! let jobs = JobService::new(client).list_jobs(&JobListQuery::default()).await?;
//! println!("{} jobs", jobs.total);
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod retry;
pub mod services;

pub use backoff::{compute_delay, RetryPolicy};
pub use client::{ApiClient, ClientConfig};
pub use config::{load_settings, ConfigError, Settings};
pub use error::{classify, ApiError, ErrorKind, Failure};
pub use health::{
    evaluate_health, HealthMonitor, HealthProbe, HealthReport, HealthSnapshot, HealthState,
    MonitorConfig,
};
pub use retry::{run_with_retry, RetryCallbacks};
pub use services::{
    HealthService, Job, JobList, JobListQuery, JobService, JobStatus, ResultsOptions,
    ResultsService, ScrapeRequest, ScrapeResult, SortOrder,
};
