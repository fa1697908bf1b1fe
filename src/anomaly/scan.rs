// src/anomaly/scan.rs

use tracing::{info, warn};

use crate::anomaly::classifier::AnomalyClassifier;
use crate::errors::{FleetError, Result};
use crate::telemetry::TelemetryEvent;

/// Totals from a standalone anomaly scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub scanned: usize,
    pub anomalies: usize,
}

/// Classify every event and log the anomalous ones.
///
/// Unlike the simulation harness this does not score anything; it is the
/// body of the `anomaly_scan` handler. The first classifier error aborts the
/// scan.
pub fn scan_events<I>(events: I, classifier: &dyn AnomalyClassifier) -> Result<ScanSummary>
where
    I: IntoIterator<Item = Result<TelemetryEvent>>,
{
    let mut summary = ScanSummary::default();

    for (index, event) in events.into_iter().enumerate() {
        let event = event?;
        let flagged = classifier
            .classify(&event)
            .map_err(|e| FleetError::Classifier {
                index,
                node_id: event.node_id.clone(),
                timestamp: event.timestamp,
                reason: e.to_string(),
            })?;

        summary.scanned += 1;
        if flagged {
            summary.anomalies += 1;
            warn!(
                timestamp = %event.timestamp,
                node = %event.node_id,
                event_type = %event.event_type,
                payload = ?event.payload,
                "anomaly detected"
            );
        }
    }

    info!(
        scanned = summary.scanned,
        anomalies = summary.anomalies,
        "anomaly scan complete"
    );
    Ok(summary)
}
