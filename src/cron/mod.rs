// src/cron/mod.rs

//! Cron trigger expressions.
//!
//! - [`field`] parses one field into a typed matcher.
//! - [`expr`] combines five matchers into a [`CronExpr`] and implements the
//!   due-check (`is_due`) and next-instant search (`next_due`).
//!
//! The parser is pure and independent of the scheduler so both can be tested
//! on their own. The next-instant search runs on `cron::Schedule`, compiled
//! from the matchers; the `cron` crate's own grammar is not exposed because
//! it differs from five-field cron (a leading seconds field, `1 = Sunday`
//! day-of-week numbering, and AND-ed day fields).

pub mod expr;
pub mod field;

use thiserror::Error;

pub use expr::{truncate_to_minute, CronExpr};
pub use field::{FieldKind, FieldMatcher};

/// Reasons a cron expression is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("expected 5 fields (minute hour day-of-month month day-of-week), got {0}")]
    FieldCount(usize),

    #[error("empty {field} field or list item")]
    EmptyField { field: FieldKind },

    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: FieldKind, value: String },

    #[error("{field} value {value} out of range {min}-{max}")]
    OutOfRange {
        field: FieldKind,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field} range {start}-{end} is descending")]
    InvalidRange {
        field: FieldKind,
        start: u32,
        end: u32,
    },

    #[error("invalid {field} step '{value}' (must be an integer >= 1)")]
    InvalidStep { field: FieldKind, value: String },

    #[error("expression '{0}' never matches a real calendar day")]
    Unsatisfiable(String),

    #[error("compiling schedule '{expr}': {message}")]
    Compile { expr: String, message: String },
}
