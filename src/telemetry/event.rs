// src/telemetry/event.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalised telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub timestamp: DateTime<Utc>,
    pub node_id: String,
    pub event_type: String,
    #[serde(default)]
    pub payload: BTreeMap<String, serde_json::Value>,
}

impl TelemetryEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        node_id: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            node_id: node_id.into(),
            event_type: event_type.into(),
            payload: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// One record of a raw telemetry stream, as emitted by the nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTelemetryRecord {
    pub timestamp: DateTime<Utc>,
    pub node_id: String,
    pub sensor: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}
