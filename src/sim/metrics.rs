// src/sim/metrics.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final metrics of one simulation run.
///
/// Only constructible through [`MissionRunMetrics::new`] or
/// [`MetricsAccumulator::finish`], and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionRunMetrics {
    total_events: u64,
    anomaly_count: u64,
    anomaly_rate: f64,
    duration_seconds: f64,
}

impl MissionRunMetrics {
    /// Build metrics from raw counts; `anomaly_rate` is derived (0 when there
    /// are no events).
    pub fn new(total_events: u64, anomaly_count: u64, duration_seconds: f64) -> Self {
        debug_assert!(anomaly_count <= total_events);
        let anomaly_rate = if total_events == 0 {
            0.0
        } else {
            anomaly_count as f64 / total_events as f64
        };
        Self {
            total_events,
            anomaly_count,
            anomaly_rate,
            duration_seconds,
        }
    }

    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    pub fn anomaly_count(&self) -> u64 {
        self.anomaly_count
    }

    pub fn anomaly_rate(&self) -> f64 {
        self.anomaly_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}

/// Incremental builder for [`MissionRunMetrics`], owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    total_events: u64,
    anomaly_count: u64,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, timestamp: DateTime<Utc>, anomalous: bool) {
        self.total_events += 1;
        if anomalous {
            self.anomaly_count += 1;
        }
        self.first = Some(self.first.map_or(timestamp, |t| t.min(timestamp)));
        self.last = Some(self.last.map_or(timestamp, |t| t.max(timestamp)));
    }

    /// Consume the accumulator. An empty run yields all-zero metrics.
    pub fn finish(self) -> MissionRunMetrics {
        let duration_seconds = match (self.first, self.last) {
            (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        };
        MissionRunMetrics::new(self.total_events, self.anomaly_count, duration_seconds)
    }
}
