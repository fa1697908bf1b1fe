// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When a failed dispatch is retried.
///
/// - `NextTick`: the retry is deferred; the scheduler picks it up on the
///   first tick at or after `failed_at + backoff` (default behaviour).
/// - `Inline`: the engine drains retries within the same tick pass, sleeping
///   for the backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    #[default]
    NextTick,
    Inline,
}

impl FromStr for RetryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "next_tick" => Ok(RetryMode::NextTick),
            "inline" => Ok(RetryMode::Inline),
            other => Err(format!(
                "invalid retry_mode: {other} (expected \"next_tick\" or \"inline\")"
            )),
        }
    }
}

/// Outcome of the most recent completed dispatch of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NeverRun,
    Success,
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::NeverRun => "never_run",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}
