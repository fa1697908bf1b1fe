// src/sim/profile.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{FleetError, Result};

/// Thresholds a run is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuccessProfile {
    /// Highest acceptable anomaly rate, within `[0, 1]`.
    pub max_anomaly_rate: f64,
    pub min_events: u64,
    pub max_duration_seconds: f64,
}

/// Named success profiles, loaded from the profile document.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, SuccessProfile>,
}

impl ProfileRegistry {
    pub fn new(profiles: BTreeMap<String, SuccessProfile>) -> Self {
        Self { profiles }
    }

    /// Look up a profile by name. There is no fallback profile.
    pub fn resolve(&self, name: &str) -> Result<&SuccessProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| FleetError::UnknownProfile(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}
