// src/telemetry/parser.rs

//! Raw stream → ordered [`TelemetryEvent`]s.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::Result;
use crate::telemetry::event::{RawTelemetryRecord, TelemetryEvent};

/// Read a raw telemetry stream (JSON array) from disk and normalise it.
pub fn parse_stream_file(path: impl AsRef<Path>) -> Result<Vec<TelemetryEvent>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading telemetry stream at {:?}", path))?;
    let events = parse_stream(&contents)?;
    info!(path = ?path, events = events.len(), "telemetry stream parsed");
    Ok(events)
}

/// Normalise a raw telemetry stream.
///
/// Each raw record becomes one event with `event_type = sensor`. Payloads
/// go through the sensor's normaliser. The output is sorted by timestamp
/// (stable, so records sharing a timestamp keep stream order), which is the
/// ordering guarantee downstream consumers rely on.
pub fn parse_stream(contents: &str) -> Result<Vec<TelemetryEvent>> {
    let records: Vec<RawTelemetryRecord> = serde_json::from_str(contents)?;

    let mut events: Vec<TelemetryEvent> = records
        .into_iter()
        .map(|r| TelemetryEvent {
            timestamp: r.timestamp,
            payload: normalise_payload(&r.sensor, r.data),
            node_id: r.node_id,
            event_type: r.sensor,
        })
        .collect();

    events.sort_by_key(|e| e.timestamp);
    Ok(events)
}

/// Apply the sensor-specific normaliser, falling back to passing data
/// through unchanged.
pub fn normalise_payload(
    sensor: &str,
    data: serde_json::Map<String, Value>,
) -> BTreeMap<String, Value> {
    match sensor {
        "camera" => normalise_camera(data),
        _ => data.into_iter().collect(),
    }
}

/// Camera payloads: `resolution = "1920x1080"` becomes
/// `resolution_px = 2073600`. Unparsable resolutions are kept verbatim.
fn normalise_camera(data: serde_json::Map<String, Value>) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();

    for (key, value) in data {
        if key == "resolution" {
            if let Some(px) = value.as_str().and_then(resolution_to_pixels) {
                out.insert("resolution_px".to_string(), Value::from(px));
                continue;
            }
            debug!(?value, "camera resolution not in WxH form; keeping raw value");
        }
        out.insert(key, value);
    }

    out
}

fn resolution_to_pixels(s: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").expect("static resolution regex is valid")
    });

    let caps = re.captures(s)?;
    let w: u64 = caps[1].parse().ok()?;
    let h: u64 = caps[2].parse().ok()?;
    w.checked_mul(h)
}
