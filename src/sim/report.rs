// src/sim/report.rs

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::errors::Result;
use crate::sim::criteria::FailureReason;
use crate::sim::metrics::MissionRunMetrics;

/// Terminal artifact of a simulation run.
///
/// `passed` is derived from `failure_reasons` at construction and the fields
/// are private, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    profile_name: String,
    metrics: MissionRunMetrics,
    passed: bool,
    failure_reasons: Vec<FailureReason>,
}

impl SimulationReport {
    pub fn new(
        profile_name: impl Into<String>,
        metrics: MissionRunMetrics,
        failure_reasons: Vec<FailureReason>,
    ) -> Self {
        Self {
            profile_name: profile_name.into(),
            metrics,
            passed: failure_reasons.is_empty(),
            failure_reasons,
        }
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn metrics(&self) -> &MissionRunMetrics {
        &self.metrics
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn failure_reasons(&self) -> &[FailureReason] {
        &self.failure_reasons
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating report directory {:?}", parent))?;
            }
        }
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json).with_context(|| format!("writing report to {:?}", path))?;
        Ok(())
    }
}
