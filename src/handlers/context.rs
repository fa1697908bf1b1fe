// src/handlers/context.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};

/// Everything a handler gets to see about the dispatch it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskContext {
    pub task_name: String,
    /// Instant the task was found due. Retries carry the original instant.
    pub reference_instant: DateTime<Utc>,
    pub parameters: BTreeMap<String, String>,
    /// 1-based attempt number.
    pub attempt: u32,
}

impl TaskContext {
    pub fn new(task_name: impl Into<String>, reference_instant: DateTime<Utc>) -> Self {
        Self {
            task_name: task_name.into(),
            reference_instant,
            parameters: BTreeMap::new(),
            attempt: 1,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Optional parameter; empty strings count as absent.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn required_param(&self, key: &str) -> anyhow::Result<&str> {
        self.param(key)
            .ok_or_else(|| anyhow!("task '{}' is missing parameter '{key}'", self.task_name))
    }

    pub fn required_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        self.required_param(key).map(PathBuf::from)
    }

    /// Parse an optional parameter with `FromStr`.
    pub fn parsed_param<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.param(key)
            .map(|raw| {
                raw.parse::<T>()
                    .with_context(|| format!("parameter '{key}' has invalid value '{raw}'"))
            })
            .transpose()
    }
}

/// What a handler reports back on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOutput {
    pub summary: Option<String>,
}

impl HandlerOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
        }
    }
}
