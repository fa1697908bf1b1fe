#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use fleetsim::config::{validate_schedule, validate_task, RawScheduleFile, RawTask, RetrySection};
use fleetsim::schedule::{Schedule, TaskDefinition};
use fleetsim::telemetry::TelemetryEvent;

/// Builder for `RawTask` to simplify test setup.
pub struct TaskBuilder {
    task: RawTask,
}

impl TaskBuilder {
    pub fn new(name: &str, trigger: &str, handler: &str) -> Self {
        Self {
            task: RawTask {
                name: name.to_string(),
                trigger: trigger.to_string(),
                handler: handler.to_string(),
                enabled: true,
                retry: RetrySection::default(),
                params: BTreeMap::new(),
            },
        }
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.task.retry.max_attempts = n;
        self
    }

    pub fn backoff_seconds(mut self, secs: f64) -> Self {
        self.task.retry.backoff_seconds = secs;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.task.enabled = false;
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.task.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(self) -> RawTask {
        self.task
    }

    /// Validate against the given handler names.
    pub fn build(self, known_handlers: &[&str]) -> TaskDefinition {
        validate_task(&self.task, known_handlers).expect("Failed to build valid task from builder")
    }
}

/// Builder for a whole schedule document.
pub struct ScheduleBuilder {
    raw: RawScheduleFile,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawScheduleFile::default(),
        }
    }

    pub fn with_task(mut self, task: TaskBuilder) -> Self {
        self.raw.task.push(task.raw());
        self
    }

    pub fn retry_mode(mut self, mode: &str) -> Self {
        self.raw.scheduler.retry_mode = mode.to_string();
        self
    }

    pub fn run_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw.scheduler.run_log = Some(path.into());
        self
    }

    pub fn raw(self) -> RawScheduleFile {
        self.raw
    }

    pub fn build(self, known_handlers: &[&str]) -> Schedule {
        validate_schedule(&self.raw, known_handlers)
            .expect("Failed to build valid schedule from builder")
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` events from one node spread evenly over `span_secs` starting at
/// `start` (first at `start`, last at `start + span_secs`). Events whose
/// index is in `anomalous` get `temperature_c = 120`, the rest 40.
pub fn thermal_events(
    start: DateTime<Utc>,
    count: usize,
    span_secs: i64,
    anomalous: &[usize],
) -> Vec<TelemetryEvent> {
    let span_ms = span_secs * 1000;
    let steps = count.saturating_sub(1).max(1) as i64;
    (0..count)
        .map(|i| {
            let offset = TimeDelta::milliseconds(span_ms * i as i64 / steps);
            let temp = if anomalous.contains(&i) { 120.0 } else { 40.0 };
            TelemetryEvent::new(start + offset, "node-1", "thermal").with_value("temperature_c", temp)
        })
        .collect()
}
