use std::time::Duration;

use proptest::prelude::*;

use super::{
    baseline_delay_ms, compute_delay, compute_delay_with, JitterSource, NoJitter, RetryPolicy,
};
use crate::error::ErrorKind;

/// Always returns the top of the allowed range.
struct MaxJitter;

impl JitterSource for MaxJitter {
    fn sample(&mut self, upper_ms: f64) -> f64 {
        upper_ms
    }
}

/// Returns garbage to make sure it is clamped.
struct WildJitter(f64);

impl JitterSource for WildJitter {
    fn sample(&mut self, _upper_ms: f64) -> f64 {
        self.0
    }
}

fn policy(base: u64, max: u64, factor: f64) -> RetryPolicy {
    RetryPolicy::default()
        .with_delays(base, max)
        .with_backoff_factor(factor)
}

#[test]
fn baseline_grows_geometrically_until_capped() {
    let policy = policy(100, 1_000, 2.0);
    let delays: Vec<f64> = (1..=6).map(|n| baseline_delay_ms(n, &policy)).collect();
    assert_eq!(delays, vec![100.0, 200.0, 400.0, 800.0, 1_000.0, 1_000.0]);
}

#[test]
fn attempt_zero_is_treated_as_first_attempt() {
    let policy = policy(250, 5_000, 3.0);
    assert_eq!(baseline_delay_ms(0, &policy), baseline_delay_ms(1, &policy));
}

#[test]
fn stubbed_jitter_gives_identical_baseline() {
    let policy = policy(100, 10_000, 2.0);
    let first = compute_delay_with(3, &policy, &mut NoJitter);
    let second = compute_delay_with(3, &policy, &mut NoJitter);
    assert_eq!(first, second);
    assert_eq!(first, Duration::from_millis(400));
}

#[test]
fn jitter_is_additive_and_bounded_by_ten_percent() {
    let policy = policy(1_000, 10_000, 2.0);
    assert_eq!(
        compute_delay_with(1, &policy, &mut MaxJitter),
        Duration::from_millis(1_100)
    );
    assert_eq!(
        compute_delay_with(1, &policy, &mut WildJitter(1e9)),
        Duration::from_millis(1_100)
    );
    assert_eq!(
        compute_delay_with(1, &policy, &mut WildJitter(-50.0)),
        Duration::from_millis(1_000)
    );
    assert_eq!(
        compute_delay_with(1, &policy, &mut WildJitter(f64::NAN)),
        Duration::from_millis(1_000)
    );
}

#[test]
fn huge_attempt_numbers_saturate_at_cap() {
    let policy = policy(100, 30_000, 2.0);
    assert_eq!(baseline_delay_ms(usize::MAX, &policy), 30_000.0);
}

#[test]
fn default_policy_retries_transient_kinds_only() {
    let policy = RetryPolicy::default();
    assert!(policy.allows(ErrorKind::Network));
    assert!(policy.allows(ErrorKind::Timeout));
    assert!(policy.allows(ErrorKind::Server));
    assert!(!policy.allows(ErrorKind::Validation));
    assert!(!policy.allows(ErrorKind::Unknown));
    assert!(policy.validate().is_ok());
}

#[test]
fn fast_policy_is_shorter_than_default() {
    let fast = RetryPolicy::fast();
    let default = RetryPolicy::default();
    assert!(fast.max_attempts <= default.max_attempts);
    assert!(fast.max_delay_ms < default.max_delay_ms);
    assert!(fast.validate().is_ok());
}

#[test]
fn validate_rejects_broken_policies() {
    assert!(RetryPolicy::default().with_max_attempts(0).validate().is_err());
    assert!(RetryPolicy::default()
        .with_backoff_factor(1.0)
        .validate()
        .is_err());
    assert!(RetryPolicy::default()
        .with_backoff_factor(f64::NAN)
        .validate()
        .is_err());
    assert!(RetryPolicy::default()
        .with_delays(500, 100)
        .validate()
        .is_err());
}

proptest! {
    #[test]
    fn delay_never_exceeds_cap_plus_jitter(
        attempt in 1usize..64,
        base in 1u64..5_000,
        extra in 0u64..60_000,
        factor in 1.01f64..4.0,
    ) {
        let policy = policy(base, base + extra, factor);
        let delay = compute_delay(attempt, &policy).as_secs_f64() * 1_000.0;
        prop_assert!(delay <= policy.max_delay_ms as f64 * 1.1 + 1e-3);
        prop_assert!(delay >= baseline_delay_ms(attempt, &policy) - 1e-3);
    }

    #[test]
    fn baseline_is_non_decreasing(
        attempt in 1usize..64,
        base in 1u64..5_000,
        extra in 0u64..60_000,
        factor in 1.01f64..4.0,
    ) {
        let policy = policy(base, base + extra, factor);
        prop_assert!(baseline_delay_ms(attempt + 1, &policy) >= baseline_delay_ms(attempt, &policy));
    }
}
