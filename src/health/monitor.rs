use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    backoff::RetryPolicy,
    error::ApiError,
    retry::{run_with_retry, RetryCallbacks},
};

use super::{
    probe::HealthProbe,
    report::{HealthSnapshot, HealthState},
};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Called with the new health value when it flips.
pub type HealthChangeFn = dyn Fn(bool, Option<&HealthSnapshot>) + Send + Sync;

/// Called once per failed liveness call.
pub type HealthErrorFn = dyn Fn(&ApiError) + Send + Sync;

/// Polling parameters and subscriber callbacks.
#[derive(Clone)]
pub struct MonitorConfig {
    interval: Duration,
    probe_policy: RetryPolicy,
    on_health_change: Option<Arc<HealthChangeFn>>,
    on_error: Option<Arc<HealthErrorFn>>,
}

impl MonitorConfig {
    /// Polls every `interval`, each call wrapped in [`RetryPolicy::fast`].
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            probe_policy: RetryPolicy::fast(),
            on_health_change: None,
            on_error: None,
        }
    }

    /// Replaces the policy wrapping each liveness call.
    pub fn probe_policy(mut self, policy: RetryPolicy) -> Self {
        self.probe_policy = policy;
        self
    }

    pub fn on_health_change<F>(mut self, f: F) -> Self
    where
        F: Fn(bool, Option<&HealthSnapshot>) + Send + Sync + 'static,
    {
        self.on_health_change = Some(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ApiError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl std::fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("interval", &self.interval)
            .field("probe_policy", &self.probe_policy)
            .field("on_health_change", &self.on_health_change.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Polls a [`HealthProbe`] and reports health transitions.
///
/// Subscribers hear about a change only when the boolean health value flips,
/// not on every poll. Clones share the same state and timer.
#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    probe: Arc<dyn HealthProbe>,
    status: Mutex<Status>,
    task: Mutex<Option<RunningTask>>,
    tick_lock: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct Status {
    state: HealthState,
    last_snapshot: Option<HealthSnapshot>,
}

struct RunningTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn new<P>(probe: P) -> Self
    where
        P: HealthProbe + 'static,
    {
        Self::from_arc(Arc::new(probe))
    }

    pub fn from_arc(probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            inner: Arc::new(Inner {
                probe,
                status: Mutex::new(Status::default()),
                task: Mutex::new(None),
                tick_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Starts polling; a timer that is already running is stopped first.
    ///
    /// The first poll runs immediately. Polls never overlap: a slow one
    /// delays the next. Must be called from within a tokio runtime.
    pub fn start_monitoring(&self, config: MonitorConfig) {
        let mut task = self.inner.task.lock();
        if let Some(previous) = task.take() {
            log::debug!("restarting health monitor");
            previous.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.inner),
            config,
            cancel.clone(),
        ));
        *task = Some(RunningTask { cancel, handle });
    }

    /// Stops polling. Safe to call repeatedly and from inside callbacks.
    pub fn stop_monitoring(&self) {
        if let Some(running) = self.inner.task.lock().take() {
            log::debug!("stopping health monitor");
            running.cancel.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.task.lock().as_ref().is_some_and(|running| {
            !running.cancel.is_cancelled() && !running.handle.is_finished()
        })
    }

    /// Performs one poll outside the timer, firing `config`'s callbacks.
    ///
    /// Waits for any poll already in progress. Returns the snapshot, or
    /// `None` when the liveness call failed.
    pub async fn check_once(&self, config: &MonitorConfig) -> Option<HealthSnapshot> {
        self.inner.tick(config, None).await
    }

    pub fn state(&self) -> HealthState {
        self.inner.status.lock().state
    }

    /// Most recent successful snapshot, if any.
    pub fn last_snapshot(&self) -> Option<HealthSnapshot> {
        self.inner.status.lock().last_snapshot.clone()
    }
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("state", &self.state())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_loop(inner: Arc<Inner>, config: MonitorConfig, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = inner.tick(&config, Some(&cancel)) => {}
        }
    }
    log::debug!("health monitor loop exited");
}

impl Inner {
    async fn tick(
        &self,
        config: &MonitorConfig,
        cancel: Option<&CancellationToken>,
    ) -> Option<HealthSnapshot> {
        let _guard = self.tick_lock.lock().await;

        let started = Instant::now();
        let outcome = run_with_retry(
            || self.probe.check(),
            &config.probe_policy,
            &RetryCallbacks::new(),
        )
        .await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if is_cancelled(cancel) {
            return None;
        }

        match outcome {
            Ok(report) => {
                let snapshot = HealthSnapshot::from_report(&report, latency_ms);
                log::debug!(
                    "health poll: healthy={} latency={}ms",
                    snapshot.healthy,
                    latency_ms
                );
                self.observe(snapshot.healthy, Some(&snapshot), config, cancel);
                Some(snapshot)
            }
            Err(err) => {
                log::warn!("health poll failed: {err}");
                if let Some(on_error) = &config.on_error {
                    on_error(&err);
                }
                if !is_cancelled(cancel) {
                    self.observe(false, None, config, cancel);
                }
                None
            }
        }
    }

    fn observe(
        &self,
        healthy: bool,
        snapshot: Option<&HealthSnapshot>,
        config: &MonitorConfig,
        cancel: Option<&CancellationToken>,
    ) {
        let changed = {
            let mut status = self.status.lock();
            let was_healthy = status.state.assumed_healthy();
            status.state = HealthState::from(healthy);
            if let Some(snapshot) = snapshot {
                status.last_snapshot = Some(snapshot.clone());
            }
            was_healthy != healthy
        };

        if changed && !is_cancelled(cancel) {
            log::info!(
                "service is now {}",
                if healthy { "healthy" } else { "unhealthy" }
            );
            if let Some(on_change) = &config.on_health_change {
                on_change(healthy, snapshot);
            }
        }
    }
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(CancellationToken::is_cancelled)
}
