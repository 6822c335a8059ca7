use reqwest::Method;
use serde::de::IgnoredAny;

use crate::{
    client::{ApiClient, NO_BODY},
    error::ApiError,
};

use super::{
    check_id,
    types::{Job, JobList, JobListQuery, ScrapeRequest},
};

const JOBS_PATH: &str = "/api/v1/jobs";
const SCRAPE_PATH: &str = "/api/v1/scrape";

/// Submits, lists and cancels scraping jobs.
#[derive(Debug, Clone)]
pub struct JobService {
    client: ApiClient,
}

impl JobService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_jobs(&self, query: &JobListQuery) -> Result<JobList, ApiError> {
        self.client
            .request_with_retry(Method::GET, JOBS_PATH, &query.to_query(), NO_BODY, None)
            .await
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ApiError> {
        let path = format!("{SCRAPE_PATH}/{}", check_id(id)?);
        self.client
            .request_with_retry(Method::GET, &path, &[], NO_BODY, None)
            .await
    }

    /// Submits a job. Sent once: a retried submission could create duplicates.
    pub async fn create_job(&self, request: &ScrapeRequest) -> Result<Job, ApiError> {
        self.client.post(SCRAPE_PATH, request).await
    }

    pub async fn cancel_job(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{SCRAPE_PATH}/{}", check_id(id)?);
        let _: IgnoredAny = self
            .client
            .request_with_retry(Method::DELETE, &path, &[], NO_BODY, None)
            .await?;
        Ok(())
    }
}
