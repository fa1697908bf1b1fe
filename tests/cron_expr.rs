// tests/cron_expr.rs

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use fleetsim::cron::{truncate_to_minute, CronError, CronExpr, FieldKind};
use fleetsim_test_utils::utc;
use proptest::prelude::*;

fn expr(text: &str) -> CronExpr {
    CronExpr::parse(text).unwrap()
}

#[test]
fn test_every_five_minutes_matches_only_multiples_of_five() {
    let e = expr("*/5 * * * *");
    assert!(e.matches(utc(2026, 3, 10, 10, 5, 0)));
    assert!(e.matches(utc(2026, 3, 10, 10, 0, 59)));
    assert!(!e.matches(utc(2026, 3, 10, 10, 7, 0)));
}

#[test]
fn test_lists_ranges_and_steps() {
    let e = expr("0,30 9-17/2 * * *");
    assert!(e.matches(utc(2026, 3, 10, 9, 0, 0)));
    assert!(e.matches(utc(2026, 3, 10, 11, 30, 0)));
    assert!(e.matches(utc(2026, 3, 10, 17, 0, 0)));
    assert!(!e.matches(utc(2026, 3, 10, 10, 0, 0)));
    assert!(!e.matches(utc(2026, 3, 10, 9, 15, 0)));

    // `a/s` runs to the end of the field.
    let e = expr("50/5 * * * *");
    assert!(e.matches(utc(2026, 3, 10, 9, 55, 0)));
    assert!(!e.matches(utc(2026, 3, 10, 9, 45, 0)));
}

#[test]
fn test_restricted_day_fields_use_or_semantics() {
    // 1st of the month OR any Monday.
    let e = expr("30 9 1 * 1");
    // 2026-01-01 is a Thursday.
    assert!(e.matches(utc(2026, 1, 1, 9, 30, 0)));
    // 2026-01-05 is a Monday.
    assert!(e.matches(utc(2026, 1, 5, 9, 30, 0)));
    // Tuesday the 6th: neither.
    assert!(!e.matches(utc(2026, 1, 6, 9, 30, 0)));
}

#[test]
fn test_starred_day_of_month_requires_weekday_match() {
    let e = expr("0 12 * * 1-5");
    assert!(e.matches(utc(2026, 1, 5, 12, 0, 0)));
    // 2026-01-04 is a Sunday.
    assert!(!e.matches(utc(2026, 1, 4, 12, 0, 0)));
}

#[test]
fn test_seven_means_sunday() {
    let sunday = utc(2026, 1, 4, 0, 0, 0);
    assert!(expr("0 0 * * 7").matches(sunday));
    assert!(expr("0 0 * * 0").matches(sunday));
}

#[test]
fn test_expression_text_is_normalised() {
    let e = expr("  */5   *  * * *  ");
    assert_eq!(e.as_str(), "*/5 * * * *");
    assert_eq!(e.to_string(), "*/5 * * * *");
    let parsed: CronExpr = "*/5 * * * *".parse().unwrap();
    assert_eq!(parsed, e);
}

#[test]
fn test_parse_errors() {
    assert_eq!(CronExpr::parse("* * * *"), Err(CronError::FieldCount(4)));
    assert_eq!(CronExpr::parse(""), Err(CronError::FieldCount(0)));

    assert!(matches!(
        CronExpr::parse("60 * * * *"),
        Err(CronError::OutOfRange {
            field: FieldKind::Minute,
            value: 60,
            ..
        })
    ));
    assert!(matches!(
        CronExpr::parse("* * 0 * *"),
        Err(CronError::OutOfRange {
            field: FieldKind::DayOfMonth,
            ..
        })
    ));
    assert!(matches!(
        CronExpr::parse("5-1 * * * *"),
        Err(CronError::InvalidRange { start: 5, end: 1, .. })
    ));
    assert!(matches!(
        CronExpr::parse("*/0 * * * *"),
        Err(CronError::InvalidStep { .. })
    ));
    assert!(matches!(
        CronExpr::parse("a * * * *"),
        Err(CronError::InvalidNumber { .. })
    ));
    assert!(matches!(
        CronExpr::parse("1,,2 * * * *"),
        Err(CronError::EmptyField { .. })
    ));
}

#[test]
fn test_impossible_dates_are_rejected_at_parse_time() {
    assert!(matches!(
        CronExpr::parse("0 0 30 2 *"),
        Err(CronError::Unsatisfiable(_))
    ));
    assert!(matches!(
        CronExpr::parse("0 0 31 4,6,9,11 *"),
        Err(CronError::Unsatisfiable(_))
    ));
    // Feb 29 exists in leap years.
    assert!(CronExpr::parse("0 0 29 2 *").is_ok());
}

#[test]
fn test_is_due_fires_once_per_matching_minute() {
    let e = expr("*/5 * * * *");
    let due = utc(2026, 3, 10, 10, 5, 0);

    assert!(e.is_due(due, None));
    assert!(e.is_due(due, Some(utc(2026, 3, 10, 10, 0, 0))));
    // Already ran in this minute, even if the tick is a few seconds later.
    assert!(!e.is_due(due + TimeDelta::seconds(20), Some(due)));
    // Not a matching minute.
    assert!(!e.is_due(utc(2026, 3, 10, 10, 6, 0), Some(due)));
}

#[test]
fn test_next_due_examples() {
    assert_eq!(
        expr("0 2 * * *").next_due(utc(2026, 3, 10, 10, 0, 0)),
        Some(utc(2026, 3, 11, 2, 0, 0))
    );
    // Strictly after the reference minute.
    assert_eq!(
        expr("*/5 * * * *").next_due(utc(2026, 3, 10, 10, 5, 0)),
        Some(utc(2026, 3, 10, 10, 10, 0))
    );
    assert_eq!(
        expr("*/5 * * * *").next_due(utc(2026, 3, 10, 10, 3, 42)),
        Some(utc(2026, 3, 10, 10, 5, 0))
    );
    // Year rollover.
    assert_eq!(
        expr("0 0 1 1 *").next_due(utc(2026, 12, 31, 23, 59, 0)),
        Some(utc(2027, 1, 1, 0, 0, 0))
    );
    // Next leap day.
    assert_eq!(
        expr("0 0 29 2 *").next_due(utc(2026, 3, 1, 0, 0, 0)),
        Some(utc(2028, 2, 29, 0, 0, 0))
    );
}

#[test]
fn test_next_due_day_fields() {
    // Both day fields restricted: the 20th or any Sunday.
    let either = expr("0 9 20 * 0");
    assert_eq!(
        either.next_due(utc(2026, 3, 10, 10, 0, 0)),
        Some(utc(2026, 3, 15, 9, 0, 0))
    );
    assert_eq!(
        either.next_due(utc(2026, 3, 16, 0, 0, 0)),
        Some(utc(2026, 3, 20, 9, 0, 0))
    );

    // `7` is Sunday too.
    assert_eq!(expr("0 9 * * 7"), expr("0 9 * * 0"));
    assert_eq!(
        expr("0 9 * * 7").next_due(utc(2026, 3, 10, 10, 0, 0)),
        Some(utc(2026, 3, 15, 9, 0, 0))
    );

    // A starred day-of-week step keeps both day fields AND-ed: Feb 29th on
    // a Sunday.
    let leap_sunday = expr("0 0 29 2 */7");
    assert_eq!(
        leap_sunday.next_due(utc(2026, 3, 1, 0, 0, 0)),
        Some(utc(2032, 2, 29, 0, 0, 0))
    );
    // The next one after 2088 falls past the supported years.
    assert_eq!(leap_sunday.next_due(utc(2089, 1, 1, 0, 0, 0)), None);
}

fn expr_strategy() -> impl Strategy<Value = CronExpr> {
    prop::sample::select(vec![
        "* * * * *",
        "*/5 * * * *",
        "0 2 * * *",
        "15,45 9-17 * * 1-5",
        "30 9 1 * 1",
        "0 0 1 */3 *",
        "0 0 29 2 *",
        "59 23 31 * *",
    ])
    .prop_map(|s| CronExpr::parse(s).unwrap())
}

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 2020-01-01 .. roughly 2040, second resolution.
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().timestamp();
    (0i64..20 * 365 * 24 * 3600)
        .prop_map(move |offset| DateTime::from_timestamp(start + offset, 0).unwrap())
}

proptest! {
    #[test]
    fn prop_next_due_is_a_matching_minute_after_reference(
        e in expr_strategy(),
        t in instant_strategy(),
    ) {
        let next = e.next_due(t).expect("every sampled expression recurs");
        prop_assert!(next > t);
        prop_assert!(e.matches(next));
        prop_assert_eq!(next.timestamp() % 60, 0);
        prop_assert_eq!(e.next_due(t), Some(next));
    }

    #[test]
    fn prop_next_due_is_stable_for_references_before_it(
        e in expr_strategy(),
        t in instant_strategy(),
    ) {
        let next = e.next_due(t).unwrap();
        let just_before = next - TimeDelta::minutes(1);
        prop_assert_eq!(e.next_due(just_before), Some(next));
        if just_before > truncate_to_minute(t) {
            prop_assert!(!e.matches(just_before));
        }
    }

    #[test]
    fn prop_is_due_at_most_once_per_minute(
        e in expr_strategy(),
        t in instant_strategy(),
        later_secs in 0u32..60,
    ) {
        let due = e.next_due(t).unwrap();
        prop_assert!(e.is_due(due, None));

        // Once it ran at `due`, any later tick in the same minute is not due.
        let same_minute = due + TimeDelta::seconds(i64::from(later_secs));
        prop_assert!(!e.is_due(same_minute, Some(due)));
    }
}
