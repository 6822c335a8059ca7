/// Called with the 1-based number of the attempt that just failed, before sleeping.
pub type RetryFn = dyn Fn(usize) + Send + Sync;

/// Called once when the attempt limit is reached.
pub type ExhaustedFn = dyn Fn() + Send + Sync;

/// Optional progress hooks for [`run_with_retry`](super::run_with_retry).
#[derive(Default)]
pub struct RetryCallbacks {
    on_retry: Option<Box<RetryFn>>,
    on_exhausted: Option<Box<ExhaustedFn>>,
}

impl RetryCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the hook fired before each backoff sleep.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_retry = Some(Box::new(f));
        self
    }

    /// Registers the hook fired when every attempt has failed.
    pub fn on_exhausted<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_exhausted = Some(Box::new(f));
        self
    }

    pub(super) fn retrying(&self, attempt: usize) {
        if let Some(f) = &self.on_retry {
            f(attempt);
        }
    }

    pub(super) fn exhausted(&self) {
        if let Some(f) = &self.on_exhausted {
            f();
        }
    }
}

impl std::fmt::Debug for RetryCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryCallbacks")
            .field("on_retry", &self.on_retry.is_some())
            .field("on_exhausted", &self.on_exhausted.is_some())
            .finish()
    }
}
