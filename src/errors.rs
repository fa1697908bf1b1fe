// src/errors.rs

//! Crate-wide error type.
//!
//! Variants are grouped the way callers need to react to them:
//!
//! - configuration problems (`Config`, `UnknownHandler`, `UnknownProfile`)
//!   are fatal for the affected subsystem and never retried,
//! - `Handler` is a transient failure contained by the scheduler's retry loop,
//! - `Classifier` and `OrderingViolation` abort a single simulation run,
//! - everything else is infrastructure (IO, parsing).

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown handler '{0}'")]
    UnknownHandler(String),

    #[error("unknown success profile '{0}'")]
    UnknownProfile(String),

    #[error(
        "anomaly classifier failed on event #{index} (node '{node_id}', {timestamp}): {reason}"
    )]
    Classifier {
        index: usize,
        node_id: String,
        timestamp: DateTime<Utc>,
        reason: String,
    },

    #[error(
        "telemetry out of order at event #{index}: {current} is earlier than previous {previous}"
    )]
    OrderingViolation {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FleetError {
    /// Whether this error comes from invalid configuration (as opposed to a
    /// runtime or infrastructure failure).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FleetError::Config(_) | FleetError::UnknownHandler(_) | FleetError::UnknownProfile(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
