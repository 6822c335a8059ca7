use async_trait::async_trait;

use crate::error::ApiError;

use super::report::HealthReport;

/// A single liveness call against some service.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<HealthReport, ApiError>;
}
