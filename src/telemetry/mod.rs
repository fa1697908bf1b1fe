// src/telemetry/mod.rs

//! Telemetry parsing.
//!
//! - [`event`] defines the normalised [`TelemetryEvent`].
//! - [`parser`] turns a raw node stream into ordered events, applying
//!   sensor-specific payload normalisation.
//! - [`log`] reads and writes the JSON-lines event log consumed by the
//!   simulation harness and the anomaly scan.

pub mod event;
pub mod log;
pub mod parser;

pub use event::{RawTelemetryRecord, TelemetryEvent};
pub use log::{read_event_log, write_event_log, EventLogReader};
pub use parser::{normalise_payload, parse_stream, parse_stream_file};
