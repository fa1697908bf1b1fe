// src/config/validate.rs

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::anomaly::RuleClassifier;
use crate::config::model::{RawProfilesFile, RawScheduleFile, RawTask, SchedulerSection};
use crate::cron::CronExpr;
use crate::errors::{FleetError, Result};
use crate::schedule::{RetryPolicy, Schedule, SchedulerSettings, TaskDefinition};
use crate::sim::{ProfileRegistry, SuccessProfile};
use crate::types::RetryMode;

/// Validate a raw schedule document against the set of known handler names.
///
/// Fail-closed: the first invalid definition rejects the whole document, so
/// a partially valid schedule never becomes active.
///
/// Checks:
/// - `[scheduler]` settings are sane (`tick_interval_secs >= 1`, known
///   `retry_mode`)
/// - every task name is non-empty and unique
/// - every trigger parses as a five-field cron expression
/// - every handler is registered
/// - `retry.max_attempts >= 1` and `retry.backoff_seconds` is a finite
///   number within `[0, MAX_BACKOFF_SECONDS]`
pub fn validate_schedule(raw: &RawScheduleFile, known_handlers: &[&str]) -> Result<Schedule> {
    let settings = validate_settings(&raw.scheduler)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut tasks = Vec::with_capacity(raw.task.len());

    for task in raw.task.iter() {
        let def = validate_task(task, known_handlers)?;
        if !seen.insert(task.name.as_str()) {
            return Err(FleetError::Config(format!(
                "duplicate task name '{}'",
                task.name
            )));
        }
        tasks.push(def);
    }

    Ok(Schedule { settings, tasks })
}

/// Validate a single task entry in isolation (everything except uniqueness).
pub fn validate_task(raw: &RawTask, known_handlers: &[&str]) -> Result<TaskDefinition> {
    if raw.name.trim().is_empty() {
        return Err(FleetError::Config("task name must not be empty".into()));
    }

    let trigger = CronExpr::parse(&raw.trigger).map_err(|e| {
        FleetError::Config(format!(
            "task '{}' has invalid trigger '{}': {}",
            raw.name, raw.trigger, e
        ))
    })?;

    if !known_handlers.contains(&raw.handler.as_str()) {
        return Err(FleetError::Config(format!(
            "task '{}' references unknown handler '{}' (known: {})",
            raw.name,
            raw.handler,
            known_handlers.join(", ")
        )));
    }

    if raw.retry.max_attempts == 0 {
        return Err(FleetError::Config(format!(
            "task '{}': retry.max_attempts must be >= 1 (got 0)",
            raw.name
        )));
    }

    let backoff = backoff_from_secs(raw.retry.backoff_seconds).ok_or_else(|| {
        FleetError::Config(format!(
            "task '{}': retry.backoff_seconds must be a finite number within [0, {}] (got {})",
            raw.name, MAX_BACKOFF_SECONDS, raw.retry.backoff_seconds
        ))
    })?;

    Ok(TaskDefinition {
        name: raw.name.clone(),
        trigger,
        handler: raw.handler.clone(),
        enabled: raw.enabled,
        retry_policy: RetryPolicy {
            max_attempts: raw.retry.max_attempts,
            backoff,
        },
        params: raw.params.clone(),
    })
}

fn validate_settings(section: &SchedulerSection) -> Result<SchedulerSettings> {
    if section.tick_interval_secs == 0 {
        return Err(FleetError::Config(
            "[scheduler].tick_interval_secs must be >= 1 (got 0)".into(),
        ));
    }

    let retry_mode = RetryMode::from_str(&section.retry_mode)
        .map_err(|e| FleetError::Config(format!("[scheduler].retry_mode: {e}")))?;

    Ok(SchedulerSettings {
        tick_interval: Duration::from_secs(section.tick_interval_secs),
        retry_mode,
        run_log: section.run_log.clone(),
    })
}

/// Upper bound on a retry backoff (30 days).
pub const MAX_BACKOFF_SECONDS: f64 = 30.0 * 24.0 * 3600.0;

fn backoff_from_secs(secs: f64) -> Option<TimeDelta> {
    if !secs.is_finite() || !(0.0..=MAX_BACKOFF_SECONDS).contains(&secs) {
        return None;
    }
    TimeDelta::try_milliseconds((secs * 1000.0).round() as i64)
}

/// Validate the profile document: every profile's thresholds must be in
/// range and every classifier rule must compile.
pub fn validate_profiles(raw: &RawProfilesFile) -> Result<(ProfileRegistry, RuleClassifier)> {
    let mut profiles = BTreeMap::new();

    for (name, p) in raw.profiles.iter() {
        if !(0.0..=1.0).contains(&p.max_anomaly_rate) {
            return Err(FleetError::Config(format!(
                "profile '{}': max_anomaly_rate must be within [0, 1] (got {})",
                name, p.max_anomaly_rate
            )));
        }
        if !p.max_duration_seconds.is_finite() || p.max_duration_seconds < 0.0 {
            return Err(FleetError::Config(format!(
                "profile '{}': max_duration_seconds must be a finite number >= 0 (got {})",
                name, p.max_duration_seconds
            )));
        }
        profiles.insert(
            name.clone(),
            SuccessProfile {
                max_anomaly_rate: p.max_anomaly_rate,
                min_events: p.min_events,
                max_duration_seconds: p.max_duration_seconds,
            },
        );
    }

    let classifier = RuleClassifier::from_config(&raw.classifier)?;

    Ok((ProfileRegistry::new(profiles), classifier))
}
