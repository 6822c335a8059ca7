use reqwest::Method;

use crate::{
    client::{ApiClient, NO_BODY},
    error::ApiError,
};

use super::{
    check_id,
    types::{ResultsOptions, ScrapeResult},
};

const RESULTS_PATH: &str = "/api/v1/results";

#[derive(Debug, Clone)]
pub struct ResultsService {
    client: ApiClient,
}

impl ResultsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_results(
        &self,
        id: &str,
        options: ResultsOptions,
    ) -> Result<ScrapeResult, ApiError> {
        let path = format!("{RESULTS_PATH}/{}", check_id(id)?);
        self.client
            .request_with_retry(Method::GET, &path, &options.to_query(), NO_BODY, None)
            .await
    }
}
