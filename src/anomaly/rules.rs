// src/anomaly/rules.rs

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::anomaly::classifier::{AnomalyClassifier, ClassifierError};
use crate::config::model::{ClassifierSection, RawClassifierRule};
use crate::errors::{FleetError, Result};
use crate::telemetry::TelemetryEvent;

/// A bound check on one payload key.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    event_type: Option<Regex>,
    key: String,
    min: Option<f64>,
    max: Option<f64>,
}

impl ClassifierRule {
    pub fn from_raw(raw: &RawClassifierRule) -> Result<Self> {
        if raw.min.is_none() && raw.max.is_none() {
            return Err(FleetError::Config(format!(
                "classifier rule for key '{}' needs at least one of `min` / `max`",
                raw.key
            )));
        }
        if let (Some(min), Some(max)) = (raw.min, raw.max) {
            if min > max {
                return Err(FleetError::Config(format!(
                    "classifier rule for key '{}' has min {} > max {}",
                    raw.key, min, max
                )));
            }
        }

        let event_type = raw
            .event_type
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| {
                FleetError::Config(format!(
                    "classifier rule for key '{}' has invalid event_type regex: {}",
                    raw.key, e
                ))
            })?;

        Ok(Self {
            event_type,
            key: raw.key.clone(),
            min: raw.min,
            max: raw.max,
        })
    }

    fn applies_to(&self, event: &TelemetryEvent) -> bool {
        self.event_type
            .as_ref()
            .is_none_or(|re| re.is_match(&event.event_type))
    }

    /// `Ok(true)` when the value is out of bounds. Events without the key
    /// are not judged by this rule.
    fn check(&self, event: &TelemetryEvent) -> std::result::Result<bool, ClassifierError> {
        let Some(value) = event.payload.get(&self.key) else {
            return Ok(false);
        };

        let Some(v) = value.as_f64() else {
            return Err(ClassifierError::NonNumeric {
                key: self.key.clone(),
                value: render(value),
            });
        };

        let below = self.min.is_some_and(|min| v < min);
        let above = self.max.is_some_and(|max| v > max);
        Ok(below || above)
    }
}

/// Rule-based classifier: an event is anomalous when any applicable rule
/// finds its value out of bounds.
///
/// With no rules configured nothing is ever anomalous.
#[derive(Debug, Clone, Default)]
pub struct RuleClassifier {
    rules: Vec<ClassifierRule>,
}

impl RuleClassifier {
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(section: &ClassifierSection) -> Result<Self> {
        let rules = section
            .rule
            .iter()
            .map(ClassifierRule::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl AnomalyClassifier for RuleClassifier {
    fn classify(&self, event: &TelemetryEvent) -> std::result::Result<bool, ClassifierError> {
        let mut anomalous = false;

        // Every applicable rule is evaluated so that a malformed value is
        // reported even when an earlier rule already flagged the event.
        for rule in self.rules.iter().filter(|r| r.applies_to(event)) {
            if rule.check(event)? {
                trace!(
                    node = %event.node_id,
                    event_type = %event.event_type,
                    key = %rule.key,
                    "rule flagged event"
                );
                anomalous = true;
            }
        }

        Ok(anomalous)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}
