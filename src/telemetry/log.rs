// src/telemetry/log.rs

//! JSON-lines event log: one [`TelemetryEvent`] per line.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use anyhow::Context;

use crate::errors::{FleetError, Result};
use crate::telemetry::event::TelemetryEvent;

/// Write events to `path`, replacing any existing file.
pub fn write_event_log(path: impl AsRef<Path>, events: &[TelemetryEvent]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating event log directory {:?}", parent))?;
        }
    }

    let file = File::create(path).with_context(|| format!("creating event log {:?}", path))?;
    let mut writer = BufWriter::new(file);

    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Open an event log for sequential reading.
pub fn read_event_log(path: impl AsRef<Path>) -> Result<EventLogReader> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening event log {:?}", path))?;
    Ok(EventLogReader {
        lines: BufReader::new(file).lines(),
        line_no: 0,
    })
}

/// Lazily decodes events from an event log, in file order.
///
/// The reader is consumed as it goes; it cannot be rewound.
#[derive(Debug)]
pub struct EventLogReader {
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl Iterator for EventLogReader {
    type Item = Result<TelemetryEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(FleetError::Io(e))),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let line_no = self.line_no;
            return Some(serde_json::from_str(&line).map_err(|e| {
                FleetError::Other(anyhow::anyhow!("event log line {line_no}: {e}"))
            }));
        }
    }
}
