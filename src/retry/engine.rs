use std::future::Future;

use tokio::time::sleep;

use crate::{
    backoff::{compute_delay_with, JitterSource, RetryPolicy, ThreadRngJitter},
    error::{classify, ApiError, Failure},
};

use super::callbacks::RetryCallbacks;

/// Runs `op` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have been made.
///
/// `op` must be idempotent: it may run up to `max_attempts` times and the
/// engine knows nothing about its side effects. Wrapping a non-idempotent
/// call (such as creating a job) needs deduplication on the caller's side.
///
/// Attempts run strictly one after another. The error returned is the one
/// produced by the last attempt.
pub async fn run_with_retry<F, Fut, T, E>(
    op: F,
    policy: &RetryPolicy,
    callbacks: &RetryCallbacks,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Failure>,
{
    run_with_retry_jitter(op, policy, callbacks, &mut ThreadRngJitter).await
}

/// Same as [`run_with_retry`] with an explicit jitter source.
pub async fn run_with_retry_jitter<F, Fut, T, E, J>(
    mut op: F,
    policy: &RetryPolicy,
    callbacks: &RetryCallbacks,
    jitter: &mut J,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Failure>,
    J: JitterSource + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1usize;

    loop {
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => classify(err),
        };

        if !err.is_retryable() || !policy.allows(err.kind()) {
            log::debug!("attempt {attempt} failed with non-retryable error: {err}");
            return Err(err);
        }

        if attempt >= max_attempts {
            log::debug!("giving up after {attempt} attempts: {err}");
            callbacks.exhausted();
            return Err(err);
        }

        callbacks.retrying(attempt);
        let delay = compute_delay_with(attempt, policy, jitter);
        log::debug!(
            "attempt {attempt}/{max_attempts} failed ({err}), retrying in {}ms",
            delay.as_millis()
        );
        sleep(delay).await;
        attempt += 1;
    }
}
