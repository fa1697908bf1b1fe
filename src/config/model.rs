// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Schedule document as read from TOML, before validation.
///
/// ```toml
/// [scheduler]
/// tick_interval_secs = 60
/// retry_mode = "next_tick"
/// run_log = "orchestration_log.jsonl"
///
/// [[task]]
/// name = "nightly_parse"
/// trigger = "0 2 * * *"
/// handler = "parse_telemetry"
/// retry = { max_attempts = 3, backoff_seconds = 30 }
/// params = { input = "telemetry/sample_stream.json", output = "telemetry/events.jsonl" }
/// ```
///
/// Tasks are an array of tables so that document order is the dispatch
/// order and duplicate names survive deserialization (and can be rejected
/// by validation instead of silently collapsing).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScheduleFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub task: Vec<RawTask>,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSection {
    /// Seconds between ticks. Ticks are aligned to multiples of this
    /// interval since the Unix epoch, so the default lands on minute
    /// boundaries.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// `"next_tick"` (default) or `"inline"`.
    #[serde(default = "default_retry_mode")]
    pub retry_mode: String,

    /// Optional JSON-lines log of every completed dispatch attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_log: Option<PathBuf>,
}

fn default_tick_interval_secs() -> u64 {
    60
}

fn default_retry_mode() -> String {
    "next_tick".to_string()
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            retry_mode: default_retry_mode(),
            run_log: None,
        }
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTask {
    pub name: String,

    /// Five-field cron expression.
    pub trigger: String,

    /// Key into the handler registry.
    pub handler: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub retry: RetrySection,

    /// Free-form parameters handed to the handler.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

/// `retry = { ... }` inline table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub backoff_seconds: f64,
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_seconds: 0.0,
        }
    }
}

/// Success profile / classifier document.
///
/// ```toml
/// [profiles.default]
/// max_anomaly_rate = 0.1
/// min_events = 1
/// max_duration_seconds = 3600
///
/// [[classifier.rule]]
/// event_type = "^thermal$"
/// key = "temperature_c"
/// max = 85.0
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, RawProfile>,

    #[serde(default)]
    pub classifier: ClassifierSection,
}

/// `[profiles.<name>]` thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProfile {
    pub max_anomaly_rate: f64,
    pub min_events: u64,
    pub max_duration_seconds: f64,
}

/// `[classifier]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierSection {
    #[serde(default)]
    pub rule: Vec<RawClassifierRule>,
}

/// One `[[classifier.rule]]` entry.
///
/// An event is anomalous when the payload value under `key` falls outside
/// `[min, max]`. `event_type` is an optional regex restricting which events
/// the rule applies to.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClassifierRule {
    #[serde(default)]
    pub event_type: Option<String>,

    pub key: String,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,
}
