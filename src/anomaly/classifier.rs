// src/anomaly/classifier.rs

use thiserror::Error;

use crate::telemetry::TelemetryEvent;

/// Why a classifier could not decide on an event.
///
/// This is distinct from "not anomalous": callers must never treat an
/// error as a negative classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("payload key '{key}' holds non-numeric value {value}")]
    NonNumeric { key: String, value: String },

    #[error("{0}")]
    Failed(String),
}

/// Black-box anomaly predicate over a single telemetry event.
pub trait AnomalyClassifier: Send + Sync {
    fn classify(&self, event: &TelemetryEvent) -> Result<bool, ClassifierError>;
}

impl<F> AnomalyClassifier for F
where
    F: Fn(&TelemetryEvent) -> Result<bool, ClassifierError> + Send + Sync,
{
    fn classify(&self, event: &TelemetryEvent) -> Result<bool, ClassifierError> {
        self(event)
    }
}
