// src/schedule/definition.rs

//! Validated, immutable task definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;

use crate::cron::CronExpr;
use crate::engine::TaskName;
use crate::types::RetryMode;

/// How often a failing task is re-attempted for a single due instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per due instant, including the first one. Always >= 1.
    pub max_attempts: u32,
    /// Delay between a failed attempt and the next one.
    pub backoff: TimeDelta,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: TimeDelta::zero(),
        }
    }
}

/// One scheduled task, as loaded from the schedule document.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub name: TaskName,
    pub trigger: CronExpr,
    /// Handler registry key; checked against the registry at load time.
    pub handler: String,
    pub enabled: bool,
    pub retry_policy: RetryPolicy,
    pub params: BTreeMap<String, String>,
}

/// Engine-level settings from `[scheduler]`.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub tick_interval: Duration,
    pub retry_mode: RetryMode,
    pub run_log: Option<PathBuf>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            retry_mode: RetryMode::default(),
            run_log: None,
        }
    }
}

/// A fully validated schedule: settings plus tasks in document order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub settings: SchedulerSettings,
    pub tasks: Vec<TaskDefinition>,
}

impl Schedule {
    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.name == name)
    }
}
