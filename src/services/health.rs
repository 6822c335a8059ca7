use async_trait::async_trait;

use crate::{
    client::ApiClient,
    error::ApiError,
    health::{HealthProbe, HealthReport},
};

const HEALTH_PATH: &str = "/health";
const VERSIONED_HEALTH_PATH: &str = "/api/v1/health";

/// Liveness calls. Single attempts; retrying is up to the caller.
#[derive(Debug, Clone)]
pub struct HealthService {
    client: ApiClient,
    path: &'static str,
}

impl HealthService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            path: HEALTH_PATH,
        }
    }

    /// Probes `/api/v1/health` instead of `/health`.
    pub fn versioned(client: ApiClient) -> Self {
        Self {
            client,
            path: VERSIONED_HEALTH_PATH,
        }
    }

    pub async fn check(&self) -> Result<HealthReport, ApiError> {
        self.client.get(self.path, &[]).await
    }
}

#[async_trait]
impl HealthProbe for HealthService {
    async fn check(&self) -> Result<HealthReport, ApiError> {
        HealthService::check(self).await
    }
}
