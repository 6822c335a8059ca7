//! Typed calls for the service's job, results and liveness endpoints.

#[path = "services/types.rs"]
mod types;

#[path = "services/jobs.rs"]
mod jobs;

#[path = "services/results.rs"]
mod results;

#[path = "services/health.rs"]
mod health;

pub use health::HealthService;
pub use jobs::JobService;
pub use results::ResultsService;
pub use types::{
    Job, JobList, JobListQuery, JobStatus, ResultsOptions, ScrapeRequest, ScrapeResult, SortOrder,
};

use crate::error::{ApiError, ErrorKind};

/// Rejects identifiers that would change the request path.
pub(crate) fn check_id(id: &str) -> Result<&str, ApiError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid && id != "." && id != ".." {
        Ok(id)
    } else {
        Err(ApiError::new(ErrorKind::Validation, format!("invalid identifier {id:?}"))
            .with_user_message("Invalid job ID"))
    }
}

#[cfg(test)]
mod tests;
