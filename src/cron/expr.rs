// src/cron/expr.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};
use ::cron::Schedule;

use crate::cron::field::{FieldKind, FieldMatcher};
use crate::cron::CronError;

/// Maximum day number per month, counting February as 29 so that
/// leap-day schedules stay valid.
const MAX_DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A parsed five-field cron expression.
///
/// Evaluation is at minute granularity in UTC; seconds and sub-seconds of
/// the instants passed in are ignored.
#[derive(Debug, Clone)]
pub struct CronExpr {
    source: String,
    minute: FieldMatcher,
    hour: FieldMatcher,
    day_of_month: FieldMatcher,
    month: FieldMatcher,
    day_of_week: FieldMatcher,
    /// One schedule per day-matching branch: two when both day fields are
    /// restricted (either may match), otherwise one.
    schedules: Vec<Schedule>,
}

impl PartialEq for CronExpr {
    fn eq(&self, other: &Self) -> bool {
        self.minute == other.minute
            && self.hour == other.hour
            && self.day_of_month == other.day_of_month
            && self.month == other.month
            && self.day_of_week == other.day_of_week
    }
}

impl Eq for CronExpr {}

impl CronExpr {
    /// Parse an expression such as `"*/5 * * * *"` or `"0 2 1,15 * 1-5"`.
    pub fn parse(text: &str) -> Result<Self, CronError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(CronError::FieldCount(parts.len()));
        }

        let mut expr = Self {
            source: parts.join(" "),
            minute: FieldMatcher::parse(FieldKind::Minute, parts[0])?,
            hour: FieldMatcher::parse(FieldKind::Hour, parts[1])?,
            day_of_month: FieldMatcher::parse(FieldKind::DayOfMonth, parts[2])?,
            month: FieldMatcher::parse(FieldKind::Month, parts[3])?,
            day_of_week: FieldMatcher::parse(FieldKind::DayOfWeek, parts[4])?,
            schedules: Vec::new(),
        };

        expr.ensure_satisfiable()?;
        expr.schedules = expr.compile_schedules()?;
        Ok(expr)
    }

    /// Normalised expression text (fields separated by single spaces).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `instant`'s minute matches every field.
    pub fn matches(&self, instant: DateTime<Utc>) -> bool {
        self.minute.contains(instant.minute())
            && self.hour.contains(instant.hour())
            && self.month.contains(instant.month())
            && self.day_matches(instant.date_naive())
    }

    /// Whether a task with this trigger is due at `reference`.
    ///
    /// Due means the reference minute matches and the task has not already
    /// run during that same minute.
    pub fn is_due(&self, reference: DateTime<Utc>, last_run: Option<DateTime<Utc>>) -> bool {
        if !self.matches(reference) {
            return false;
        }
        match last_run {
            None => true,
            Some(last) => truncate_to_minute(last) != truncate_to_minute(reference),
        }
    }

    /// The first matching minute strictly after `reference`'s minute.
    ///
    /// Returns `None` when nothing matches before the `cron` crate's last
    /// supported year (2100), e.g. a leap-day schedule whose weekday
    /// restriction no remaining leap year satisfies.
    pub fn next_due(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        // Compiled schedules fire at second 0, so "after the minute start"
        // is "after the reference minute".
        let start = truncate_to_minute(reference);
        self.schedules
            .iter()
            .filter_map(|schedule| schedule.after(&start).next())
            .min()
    }

    /// Standard cron day semantics: when both day fields are restricted a
    /// day matches if *either* matches; otherwise both must match.
    fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = self.day_of_month.contains(date.day());
        let dow = self
            .day_of_week
            .contains(date.weekday().num_days_from_sunday());

        if self.day_of_month.is_starred() || self.day_of_week.is_starred() {
            dom && dow
        } else {
            dom || dow
        }
    }

    /// Reject day-of-month / month combinations that never occur, such as
    /// `31 2` (Feb 31st).
    fn ensure_satisfiable(&self) -> Result<(), CronError> {
        let or_semantics = !self.day_of_month.is_starred() && !self.day_of_week.is_starred();
        if or_semantics {
            // Every month contains every weekday.
            return Ok(());
        }

        let possible = self.month.values().any(|m| {
            let max_day = MAX_DAYS_IN_MONTH[(m - 1) as usize];
            self.day_of_month.values().any(|d| d <= max_day)
        });

        if possible {
            Ok(())
        } else {
            Err(CronError::Unsatisfiable(self.source.clone()))
        }
    }
}

impl CronExpr {
    /// Build the `cron` crate schedules for the next-instant search.
    fn compile_schedules(&self) -> Result<Vec<Schedule>, CronError> {
        let minute = self.minute.schedule_text();
        let hour = self.hour.schedule_text();
        let dom = self.day_of_month.schedule_text();
        let month = self.month.schedule_text();
        let dow = self.day_of_week.schedule_text();

        let day_pairs = if self.day_of_month.is_starred() || self.day_of_week.is_starred() {
            vec![(dom, dow)]
        } else {
            vec![(dom, "*".to_string()), ("*".to_string(), dow)]
        };

        day_pairs
            .into_iter()
            .map(|(dom, dow)| {
                let text = format!("0 {minute} {hour} {dom} {month} {dow}");
                Schedule::from_str(&text).map_err(|e| CronError::Compile {
                    expr: self.source.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

impl FromStr for CronExpr {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CronExpr::parse(s)
    }
}

impl fmt::Display for CronExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        - TimeDelta::seconds(i64::from(instant.second()))
        - TimeDelta::nanoseconds(i64::from(instant.nanosecond()))
}
