//! Tests for recurrence expressions.

use chrono::TimeZone;

use super::*;
use crate::error::SchedulerError;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

#[test]
fn test_every_minute_is_default() {
    assert_eq!(Cadence::default().expression(), "* * * * *");
    assert_eq!(Cadence::every_minute().expression(), "* * * * *");
}

#[test]
fn test_every_n_minutes() {
    assert_eq!(Cadence::every_n_minutes(5).expression(), "*/5 * * * *");
    // Zero clamps to one, never to a zero step.
    assert_eq!(Cadence::every_n_minutes(0).expression(), "*/1 * * * *");
}

#[test]
fn test_hourly_at() {
    assert_eq!(Cadence::hourly_at(15).unwrap().expression(), "15 * * * *");
    assert!(matches!(
        Cadence::hourly_at(60),
        Err(SchedulerError::FieldOutOfRange {
            field: "minute",
            value: 60,
            ..
        })
    ));
}

#[test]
fn test_every_n_hours() {
    assert_eq!(Cadence::every_n_hours(3).expression(), "0 */3 * * *");
    assert_eq!(Cadence::every_n_hours(0).expression(), "0 */1 * * *");
}

#[test]
fn test_daily() {
    assert_eq!(Cadence::daily("9:00").unwrap().expression(), "0 9 * * *");
    // Leading zeros are insensitive.
    assert_eq!(Cadence::daily("09:00").unwrap().expression(), "0 9 * * *");
    assert_eq!(Cadence::daily("00:05").unwrap().expression(), "5 0 * * *");
}

#[test]
fn test_daily_rejects_malformed_time() {
    assert!(matches!(
        Cadence::daily("0900"),
        Err(SchedulerError::MalformedTime(_))
    ));
    assert!(matches!(
        Cadence::daily("nine:thirty"),
        Err(SchedulerError::MalformedTime(_))
    ));
    assert!(matches!(
        Cadence::daily("24:00"),
        Err(SchedulerError::FieldOutOfRange { field: "hour", .. })
    ));
    assert!(matches!(
        Cadence::daily("10:61"),
        Err(SchedulerError::FieldOutOfRange { field: "minute", .. })
    ));
}

#[test]
fn test_weekly_on() {
    assert_eq!(
        Cadence::weekly_on(1, "16:30").unwrap().expression(),
        "30 16 * * 1"
    );
    assert!(matches!(
        Cadence::weekly_on(7, "16:30"),
        Err(SchedulerError::FieldOutOfRange {
            field: "weekday",
            value: 7,
            min: 0,
            max: 6,
        })
    ));
}

#[test]
fn test_monthly_on() {
    assert_eq!(
        Cadence::monthly_on(15, "02:00").unwrap().expression(),
        "0 2 15 * *"
    );
    assert!(Cadence::monthly_on(0, "02:00").is_err());
    assert!(Cadence::monthly_on(32, "02:00").is_err());
}

#[test]
fn test_every_n_months() {
    assert_eq!(
        Cadence::every_n_months(3, "06:15").unwrap().expression(),
        "15 6 1 */3 *"
    );
    assert_eq!(
        Cadence::every_n_months(0, "06:15").unwrap().expression(),
        "15 6 1 */1 *"
    );
}

#[test]
fn test_yearly_on() {
    assert_eq!(
        Cadence::yearly_on(6, 12, "09:00").unwrap().expression(),
        "0 9 12 6 *"
    );
    assert!(Cadence::yearly_on(13, 12, "09:00").is_err());
    assert!(Cadence::yearly_on(6, 0, "09:00").is_err());
}

#[test]
fn test_every_minute_always_due() {
    let cadence = Cadence::every_minute();
    assert!(cadence.is_due(at(2026, 8, 7, 10, 15, 0)).unwrap());
    // Seconds within the minute do not matter.
    assert!(cadence.is_due(at(2026, 8, 7, 23, 59, 42)).unwrap());
}

#[test]
fn test_hourly_due_window() {
    let cadence = Cadence::hourly_at(15).unwrap();
    assert!(cadence.is_due(at(2026, 8, 7, 10, 15, 0)).unwrap());
    assert!(cadence.is_due(at(2026, 8, 7, 10, 15, 30)).unwrap());
    assert!(!cadence.is_due(at(2026, 8, 7, 10, 16, 0)).unwrap());
}

#[test]
fn test_weekday_numbering_from_sunday() {
    // 2026-08-09 is a Sunday, 2026-08-10 a Monday.
    let sunday = Cadence::weekly_on(0, "09:00").unwrap();
    assert!(sunday.is_due(at(2026, 8, 9, 9, 0, 0)).unwrap());
    assert!(!sunday.is_due(at(2026, 8, 10, 9, 0, 0)).unwrap());

    let monday = Cadence::weekly_on(1, "09:00").unwrap();
    assert!(monday.is_due(at(2026, 8, 10, 9, 0, 0)).unwrap());
    assert!(!monday.is_due(at(2026, 8, 9, 9, 0, 0)).unwrap());
}

#[test]
fn test_matcher_dialect_translation() {
    // The matcher dialect carries a seconds field and counts weekdays from
    // 1 = Sunday; the normalized form never changes.
    let cadence = Cadence::weekly_on(1, "16:30").unwrap();
    assert_eq!(cadence.expression(), "30 16 * * 1");
    assert_eq!(cadence.matcher_expression(), "0 30 16 * * 2");

    let wildcard = Cadence::daily("08:00").unwrap();
    assert_eq!(wildcard.matcher_expression(), "0 0 8 * * *");
}

#[test]
fn test_raw_expression_is_lazy() {
    let bad = Cadence::raw("not a cron expression");
    assert!(matches!(
        bad.is_due(at(2026, 8, 7, 10, 0, 0)),
        Err(SchedulerError::Expression { .. })
    ));
    // A valid raw expression evaluates normally.
    let good = Cadence::raw("*/15 * * * *");
    assert!(good.is_due(at(2026, 8, 7, 10, 30, 0)).unwrap());
    assert!(!good.is_due(at(2026, 8, 7, 10, 31, 0)).unwrap());
}

#[test]
fn test_next_and_prev_bracket_the_reference() {
    let cadence = Cadence::hourly_at(0).unwrap();
    let reference = at(2026, 8, 7, 10, 30, 0);

    let next = cadence.next_after(reference).unwrap().unwrap();
    let prev = cadence.prev_before(reference).unwrap().unwrap();

    assert_eq!(next, at(2026, 8, 7, 11, 0, 0));
    assert_eq!(prev, at(2026, 8, 7, 10, 0, 0));
    assert!(prev < reference && reference < next);
}

#[test]
fn test_round_trip_raw_expression() {
    let cadence = Cadence::raw("*/15 * * * *");
    let reference = at(2026, 8, 7, 10, 7, 0);

    let prev = cadence.prev_before(reference).unwrap().unwrap();
    let next = cadence.next_after(reference).unwrap().unwrap();

    assert_ne!(prev, next);
    assert_eq!(prev, at(2026, 8, 7, 10, 0, 0));
    assert_eq!(next, at(2026, 8, 7, 10, 15, 0));
}
