use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Query parameter carrying the cache-defeating value on reads.
pub const CACHE_BUST_PARAM: &str = "_t";

/// Hands out strictly increasing millisecond stamps.
///
/// Follows wall-clock time while it moves forward, and never repeats a value
/// when several reads land in the same millisecond.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicU64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_value(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}
