// src/cron/field.rs

//! Single-field matchers for five-field cron expressions.

use std::fmt;

use crate::cron::CronError;

/// The five positional fields of a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldKind {
    /// Inclusive bounds accepted in expression text.
    ///
    /// Day-of-week accepts `7` as an alias for Sunday (`0`).
    pub fn bounds(self) -> (u32, u32) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (0, 7),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of values one cron field accepts.
///
/// Values are stored as a bitmask (every field fits in 0..=59).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatcher {
    kind: FieldKind,
    allowed: u64,
    /// Field text starts with `*` (plain `*` or `*/step`).
    ///
    /// Only meaningful for the day fields: standard cron ORs day-of-month and
    /// day-of-week when neither is starred.
    starred: bool,
}

impl FieldMatcher {
    /// Parse one field of an expression, e.g. `"*/15"`, `"1,15"`, `"9-17/2"`.
    pub fn parse(kind: FieldKind, text: &str) -> Result<Self, CronError> {
        if text.is_empty() {
            return Err(CronError::EmptyField { field: kind });
        }

        let mut allowed = 0u64;
        for item in text.split(',') {
            allowed |= parse_item(kind, item)?;
        }

        if kind == FieldKind::DayOfWeek && allowed & (1 << 7) != 0 {
            allowed = (allowed & !(1 << 7)) | 1;
        }

        Ok(Self {
            kind,
            allowed,
            starred: text.starts_with('*'),
        })
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_starred(&self) -> bool {
        self.starred
    }

    pub fn contains(&self, value: u32) -> bool {
        value < 64 && self.allowed & (1u64 << value) != 0
    }

    /// Iterate over accepted values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        (0..64u32).filter(move |v| self.contains(*v))
    }

    /// Whether every value of the field is accepted.
    pub fn is_full(&self) -> bool {
        let (min, max) = self.kind.bounds();
        // Day-of-week `7` is folded into `0` at parse time.
        let max = if self.kind == FieldKind::DayOfWeek { 6 } else { max };
        (min..=max).all(|v| self.contains(v))
    }

    /// Render the accepted set in the syntax of the `cron` crate: `*` or an
    /// explicit list. Day-of-week is shifted to its `1 = Sunday` numbering.
    pub(crate) fn schedule_text(&self) -> String {
        if self.is_full() {
            return "*".to_string();
        }
        let offset = u32::from(self.kind == FieldKind::DayOfWeek);
        self.values()
            .map(|v| (v + offset).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse a single comma-separated item into a bitmask.
fn parse_item(kind: FieldKind, item: &str) -> Result<u64, CronError> {
    let (min, max) = kind.bounds();

    if item.is_empty() {
        return Err(CronError::EmptyField { field: kind });
    }

    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(parse_step(kind, step)?)),
        None => (item, None),
    };

    let (start, end) = if base == "*" {
        (min, max)
    } else if let Some((a, b)) = base.split_once('-') {
        let a = parse_value(kind, a)?;
        let b = parse_value(kind, b)?;
        if a > b {
            return Err(CronError::InvalidRange {
                field: kind,
                start: a,
                end: b,
            });
        }
        (a, b)
    } else {
        let a = parse_value(kind, base)?;
        match step {
            // `a/s` runs from `a` to the end of the field.
            Some(_) => (a, max),
            None => (a, a),
        }
    };

    let step = step.unwrap_or(1);
    let mut mask = 0u64;
    let mut v = start;
    while v <= end {
        mask |= 1u64 << v;
        v += step;
    }
    Ok(mask)
}

fn parse_value(kind: FieldKind, text: &str) -> Result<u32, CronError> {
    let (min, max) = kind.bounds();
    let value: u32 = text.parse().map_err(|_| CronError::InvalidNumber {
        field: kind,
        value: text.to_string(),
    })?;
    if value < min || value > max {
        return Err(CronError::OutOfRange {
            field: kind,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn parse_step(kind: FieldKind, text: &str) -> Result<u32, CronError> {
    match text.parse::<u32>() {
        Ok(step) if step >= 1 => Ok(step),
        _ => Err(CronError::InvalidStep {
            field: kind,
            value: text.to_string(),
        }),
    }
}
