//! Exponential backoff with additive jitter.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
const DEFAULT_MAX_DELAY_MS: u64 = 10_000;
const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

const FAST_MAX_ATTEMPTS: usize = 2;
const FAST_BASE_DELAY_MS: u64 = 200;
const FAST_MAX_DELAY_MS: u64 = 1_000;

/// Upper bound of the jitter as a fraction of the capped delay.
pub const JITTER_RATIO: f64 = 0.1;

/// Configuration for retry and backoff behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of attempts including the first one
    pub max_attempts: usize,
    /// Delay before the first retry in milliseconds
    pub base_delay_ms: u64,
    /// Ceiling for the non-jittered delay in milliseconds
    pub max_delay_ms: u64,
    /// Multiplier applied per attempt, must be greater than 1
    pub backoff_factor: f64,
    /// Error kinds that may be retried
    pub retry_on: Vec<ErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            retry_on: vec![ErrorKind::Network, ErrorKind::Timeout, ErrorKind::Server],
        }
    }
}

impl RetryPolicy {
    /// Short policy for liveness probes: fail fast rather than hang behind backoff.
    pub fn fast() -> Self {
        Self {
            max_attempts: FAST_MAX_ATTEMPTS,
            base_delay_ms: FAST_BASE_DELAY_MS,
            max_delay_ms: FAST_MAX_DELAY_MS,
            ..Self::default()
        }
    }

    /// A policy that performs exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delays(mut self, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    pub fn with_retry_on(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retry_on = kinds.into_iter().collect();
        self
    }

    /// Whether this policy allows retrying errors of `kind`.
    pub fn allows(&self, kind: ErrorKind) -> bool {
        self.retry_on.contains(&kind)
    }

    /// Checks the policy invariants, returning a reason on violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor <= 1.0 {
            return Err(format!(
                "backoff_factor must be a finite value greater than 1, got {}",
                self.backoff_factor
            ));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(format!(
                "max_delay_ms ({}) is lower than base_delay_ms ({})",
                self.max_delay_ms, self.base_delay_ms
            ));
        }
        Ok(())
    }
}

/// Source of the random component added to each delay.
pub trait JitterSource {
    /// Returns a value in `[0, upper_ms]`.
    fn sample(&mut self, upper_ms: f64) -> f64;
}

/// Uniform jitter drawn from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&mut self, upper_ms: f64) -> f64 {
        if !upper_ms.is_finite() || upper_ms <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(0.0..=upper_ms)
    }
}

/// Jitter that always adds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&mut self, _upper_ms: f64) -> f64 {
        0.0
    }
}

/// Non-jittered delay in milliseconds for the 1-based `attempt`.
///
/// `min(base * factor^(attempt - 1), max)`; attempt 0 is treated as 1.
pub fn baseline_delay_ms(attempt: usize, policy: &RetryPolicy) -> f64 {
    if policy.base_delay_ms == 0 {
        return 0.0;
    }
    let exponent = attempt.max(1) - 1;
    let exponent = i32::try_from(exponent).unwrap_or(i32::MAX);
    let raw = policy.base_delay_ms as f64 * policy.backoff_factor.powi(exponent);
    let max = policy.max_delay_ms as f64;
    if raw.is_nan() {
        return max;
    }
    raw.min(max)
}

/// Delay to wait after the failed `attempt`, using thread-local randomness.
pub fn compute_delay(attempt: usize, policy: &RetryPolicy) -> Duration {
    compute_delay_with(attempt, policy, &mut ThreadRngJitter)
}

/// Delay to wait after the failed `attempt` with a caller-supplied jitter source.
pub fn compute_delay_with<J>(attempt: usize, policy: &RetryPolicy, jitter: &mut J) -> Duration
where
    J: JitterSource + ?Sized,
{
    let delay = baseline_delay_ms(attempt, policy).max(0.0);
    let upper = delay * JITTER_RATIO;
    let extra = match jitter.sample(upper) {
        sample if sample.is_finite() => sample.clamp(0.0, upper),
        _ => 0.0,
    };
    Duration::from_secs_f64((delay + extra) / 1_000.0)
}

#[cfg(test)]
mod tests;
