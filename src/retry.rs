//! Bounded retries of idempotent async operations.

#[path = "retry/callbacks.rs"]
mod callbacks;

#[path = "retry/engine.rs"]
mod engine;

pub use callbacks::{ExhaustedFn, RetryCallbacks, RetryFn};
pub use engine::{run_with_retry, run_with_retry_jitter};
