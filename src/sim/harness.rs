// src/sim/harness.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::anomaly::AnomalyClassifier;
use crate::errors::{FleetError, Result};
use crate::mission::Mission;
use crate::sim::criteria::evaluate;
use crate::sim::metrics::MetricsAccumulator;
use crate::sim::profile::ProfileRegistry;
use crate::sim::report::SimulationReport;
use crate::telemetry::TelemetryEvent;

/// Replays telemetry for a mission and scores it against a success profile.
///
/// The harness itself holds no per-run state; every call to
/// [`SimulationHarness::run`] owns a fresh [`MetricsAccumulator`].
pub struct SimulationHarness {
    profiles: ProfileRegistry,
    classifier: Arc<dyn AnomalyClassifier>,
}

impl SimulationHarness {
    pub fn new(profiles: ProfileRegistry, classifier: Arc<dyn AnomalyClassifier>) -> Self {
        Self {
            profiles,
            classifier,
        }
    }

    /// Run one simulation.
    ///
    /// The profile is resolved before any telemetry is consumed. Events must
    /// arrive in non-decreasing timestamp order; an earlier timestamp aborts
    /// the run with [`FleetError::OrderingViolation`]. A classifier error
    /// aborts with [`FleetError::Classifier`]. No partial report is produced
    /// in either case.
    pub fn run<I>(&self, mission: &Mission, telemetry: I, profile_name: &str) -> Result<SimulationReport>
    where
        I: IntoIterator<Item = Result<TelemetryEvent>>,
    {
        let profile = self.profiles.resolve(profile_name)?;
        info!(
            objective = %mission.objective,
            zone = %mission.target_zone,
            profile = profile_name,
            "starting simulation run"
        );

        let mut metrics = MetricsAccumulator::new();
        let mut previous: Option<DateTime<Utc>> = None;

        for (index, event) in telemetry.into_iter().enumerate() {
            let event = event?;

            if let Some(previous) = previous {
                if event.timestamp < previous {
                    return Err(FleetError::OrderingViolation {
                        index,
                        previous,
                        current: event.timestamp,
                    });
                }
            }
            previous = Some(event.timestamp);

            let anomalous = self
                .classifier
                .classify(&event)
                .map_err(|e| FleetError::Classifier {
                    index,
                    node_id: event.node_id.clone(),
                    timestamp: event.timestamp,
                    reason: e.to_string(),
                })?;

            if anomalous {
                debug!(
                    index,
                    node = %event.node_id,
                    event_type = %event.event_type,
                    "anomalous event"
                );
            }
            metrics.record(event.timestamp, anomalous);
        }

        let metrics = metrics.finish();
        let reasons = evaluate(&metrics, profile);
        let report = SimulationReport::new(profile_name, metrics, reasons);

        info!(
            profile = profile_name,
            total_events = metrics.total_events(),
            anomaly_count = metrics.anomaly_count(),
            anomaly_rate = metrics.anomaly_rate(),
            duration_seconds = metrics.duration_seconds(),
            passed = report.passed(),
            "simulation run complete"
        );
        Ok(report)
    }
}
