//! Liveness evaluation and background polling.

#[path = "health/report.rs"]
mod report;

#[path = "health/probe.rs"]
mod probe;

#[path = "health/monitor.rs"]
mod monitor;

pub use monitor::{HealthChangeFn, HealthErrorFn, HealthMonitor, MonitorConfig};
pub use probe::HealthProbe;
pub use report::{evaluate_health, HealthReport, HealthSnapshot, HealthState};
