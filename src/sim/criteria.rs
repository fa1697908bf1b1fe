// src/sim/criteria.rs

//! Success criteria evaluation.

use std::fmt;

use serde::Serialize;

use crate::sim::metrics::MissionRunMetrics;
use crate::sim::profile::SuccessProfile;

/// A single missed criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    AnomalyRateExceeded,
    InsufficientEvents,
    DurationExceeded,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::AnomalyRateExceeded => "anomaly_rate_exceeded",
            FailureReason::InsufficientEvents => "insufficient_events",
            FailureReason::DurationExceeded => "duration_exceeded",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check metrics against a profile.
///
/// Every check runs; the result lists all missed criteria in a fixed order
/// (rate, event count, duration). An empty result means the run passed.
pub fn evaluate(metrics: &MissionRunMetrics, profile: &SuccessProfile) -> Vec<FailureReason> {
    let mut reasons = Vec::new();

    if metrics.anomaly_rate() > profile.max_anomaly_rate {
        reasons.push(FailureReason::AnomalyRateExceeded);
    }
    if metrics.total_events() < profile.min_events {
        reasons.push(FailureReason::InsufficientEvents);
    }
    if metrics.duration_seconds() > profile.max_duration_seconds {
        reasons.push(FailureReason::DurationExceeded);
    }

    reasons
}
