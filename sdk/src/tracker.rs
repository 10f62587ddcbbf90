//! In-memory aggregation of monitored service state.
//!
//! # Design
//! [`ServiceTracker`] is the agent-side scratchpad for service status
//! records, captured metrics samples, and bounded per-service log buffers.
//! It does no I/O. Interior state sits behind a single `RwLock` so readers
//! proceed concurrently while writers take exclusive access, and only the
//! operations below are exposed — callers never see the raw maps.

use std::collections::{BTreeMap, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Log lines kept per service before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Latest known status of a monitored service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    /// Unit state label, e.g. `active`, `inactive`, `failed`.
    pub state: String,
    /// Sub-state label, e.g. `running`, `exited`, `dead`.
    pub sub_state: String,
    pub restarts: u32,
    pub memory_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_since: Option<DateTime<Utc>>,
}

/// One captured metrics sample for a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSample {
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f64,
    pub memory_bytes: u64,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<ServiceStatus>,
    samples: Vec<MetricsSample>,
    logs: BTreeMap<String, VecDeque<String>>,
}

/// Thread-safe aggregation of service status, metrics, and logs.
#[derive(Debug)]
pub struct ServiceTracker {
    inner: RwLock<Inner>,
    log_capacity: usize,
}

impl Default for ServiceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceTracker {
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_log_capacity(log_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            log_capacity: log_capacity.max(1),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a status record.
    pub fn record(&self, status: ServiceStatus) {
        self.write().records.push(status);
    }

    /// First record whose name matches exactly, or `None`.
    pub fn get(&self, name: &str) -> Option<ServiceStatus> {
        self.read().records.iter().find(|r| r.name == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// All records currently in the `failed` state.
    pub fn failed(&self) -> Vec<ServiceStatus> {
        self.read()
            .records
            .iter()
            .filter(|r| r.state == "failed")
            .cloned()
            .collect()
    }

    /// Record count grouped by state label.
    pub fn count_by_state(&self) -> BTreeMap<String, usize> {
        let inner = self.read();
        let mut counts = BTreeMap::new();
        for record in &inner.records {
            *counts.entry(record.state.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Exact sum of memory use across all tracked records.
    pub fn total_memory(&self) -> u64 {
        self.read().records.iter().map(|r| r.memory_bytes).sum()
    }

    /// Append a log line for a service, dropping the oldest line once the
    /// buffer is full.
    pub fn push_log(&self, name: &str, line: &str) {
        let mut inner = self.write();
        let buffer = inner.logs.entry(name.to_string()).or_default();
        if buffer.len() == self.log_capacity {
            buffer.pop_front();
        }
        buffer.push_back(line.to_string());
    }

    /// Buffered log lines for a service, oldest first.
    pub fn logs(&self, name: &str) -> Vec<String> {
        self.read()
            .logs
            .get(name)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Capture a metrics sample.
    pub fn record_sample(&self, sample: MetricsSample) {
        self.write().samples.push(sample);
    }

    /// The sample with the latest timestamp for a service.
    ///
    /// Selection is by timestamp, not insertion order: if an older sample is
    /// recorded after a newer one, the newer one still wins.
    pub fn latest_sample(&self, service: &str) -> Option<MetricsSample> {
        self.read()
            .samples
            .iter()
            .filter(|s| s.service == service)
            .max_by_key(|s| s.timestamp)
            .cloned()
    }
}

/// Map a service's state to a 0-100 health score.
///
/// Thresholds: `failed` scores 0 regardless of sub-state or restarts;
/// `inactive` scores 50. An `active` service starts at 100 when `running`
/// (75 for any other sub-state) and loses 10 points per restart, floored at
/// 0. Unrecognized states score 25.
pub fn health_score(state: &str, sub_state: &str, restarts: u32) -> u8 {
    match state {
        "failed" => 0,
        "inactive" => 50,
        "active" => {
            let base: u32 = if sub_state == "running" { 100 } else { 75 };
            base.saturating_sub(restarts.saturating_mul(10)) as u8
        }
        _ => 25,
    }
}

/// Render an elapsed duration as `"Xd Yh Zm"`. Negative durations render as
/// zero elapsed time.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total_minutes = elapsed.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    format!("{days}d {hours}h {minutes}m")
}

/// Uptime since a start timestamp, or `"N/A"` when none was recorded.
pub fn uptime_since(since: Option<DateTime<Utc>>) -> String {
    match since {
        Some(started) => format_elapsed(Utc::now() - started),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn status(name: &str, state: &str, memory_bytes: u64) -> ServiceStatus {
        ServiceStatus {
            name: name.to_string(),
            state: state.to_string(),
            sub_state: "running".to_string(),
            restarts: 0,
            memory_bytes,
            active_since: None,
        }
    }

    #[test]
    fn unique_records_are_all_retrievable() {
        let tracker = ServiceTracker::new();
        tracker.record(status("nginx", "active", 1_000_000));
        tracker.record(status("postgres", "active", 2_000_000));
        tracker.record(status("redis", "failed", 3_000_000));

        assert_eq!(tracker.len(), 3);
        for name in ["nginx", "postgres", "redis"] {
            assert_eq!(tracker.get(name).unwrap().name, name);
        }
        assert!(tracker.get("missing").is_none());
    }

    #[test]
    fn failed_filter_returns_only_failed_records() {
        let tracker = ServiceTracker::new();
        tracker.record(status("nginx", "active", 0));
        tracker.record(status("redis", "failed", 0));
        tracker.record(status("cron", "failed", 0));

        let failed = tracker.failed();
        assert_eq!(failed.len(), 2);
        assert!(failed.iter().all(|r| r.state == "failed"));
    }

    #[test]
    fn memory_sum_is_exact() {
        let tracker = ServiceTracker::new();
        tracker.record(status("a", "active", 1_000_000));
        tracker.record(status("b", "active", 2_000_000));
        tracker.record(status("c", "active", 3_000_000));
        assert_eq!(tracker.total_memory(), 6_000_000);
    }

    #[test]
    fn count_by_state_groups_correctly() {
        let tracker = ServiceTracker::new();
        tracker.record(status("a", "active", 0));
        tracker.record(status("b", "active", 0));
        tracker.record(status("c", "failed", 0));

        let counts = tracker.count_by_state();
        assert_eq!(counts.get("active"), Some(&2));
        assert_eq!(counts.get("failed"), Some(&1));
        assert_eq!(counts.get("inactive"), None);
    }

    #[test]
    fn latest_sample_selects_by_timestamp_not_insertion_order() {
        let tracker = ServiceTracker::new();
        let newer = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2026, 8, 30, 11, 0, 0).unwrap();

        // The newer sample is inserted first.
        tracker.record_sample(MetricsSample {
            service: "nginx".to_string(),
            timestamp: newer,
            cpu_percent: 12.5,
            memory_bytes: 2_000_000,
        });
        tracker.record_sample(MetricsSample {
            service: "nginx".to_string(),
            timestamp: older,
            cpu_percent: 50.0,
            memory_bytes: 1_000_000,
        });

        let latest = tracker.latest_sample("nginx").unwrap();
        assert_eq!(latest.timestamp, newer);
        assert_eq!(latest.memory_bytes, 2_000_000);
        assert!(tracker.latest_sample("postgres").is_none());
    }

    #[test]
    fn log_buffer_is_bounded() {
        let tracker = ServiceTracker::with_log_capacity(3);
        for i in 0..5 {
            tracker.push_log("nginx", &format!("line {i}"));
        }
        assert_eq!(tracker.logs("nginx"), vec!["line 2", "line 3", "line 4"]);
        assert!(tracker.logs("postgres").is_empty());
    }

    #[test]
    fn health_score_thresholds() {
        assert_eq!(health_score("active", "running", 0), 100);
        assert_eq!(health_score("active", "running", 3), 70);
        assert_eq!(health_score("failed", "running", 0), 0);
        assert_eq!(health_score("failed", "dead", 9), 0);
        assert_eq!(health_score("inactive", "dead", 2), 50);
    }

    #[test]
    fn health_score_floors_at_zero() {
        assert_eq!(health_score("active", "running", 20), 0);
        assert_eq!(health_score("active", "exited", 8), 0);
    }

    #[test]
    fn health_score_non_running_substate_starts_at_75() {
        assert_eq!(health_score("active", "exited", 0), 75);
        assert_eq!(health_score("active", "exited", 1), 65);
    }

    #[test]
    fn format_elapsed_renders_days_hours_minutes() {
        let elapsed = TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::minutes(4);
        assert_eq!(format_elapsed(elapsed), "2d 3h 4m");
        assert_eq!(format_elapsed(TimeDelta::zero()), "0d 0h 0m");
        assert_eq!(format_elapsed(TimeDelta::minutes(-5)), "0d 0h 0m");
    }

    #[test]
    fn uptime_without_timestamp_is_not_available() {
        assert_eq!(uptime_since(None), "N/A");
    }
}
