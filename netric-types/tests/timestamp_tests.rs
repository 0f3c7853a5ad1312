use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use netric_types::{format_short_date, format_time_of_day, parse_datetime};
use serde_json::json;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parses_server_timestamp() {
    assert_eq!(
        parse_datetime(&json!("2024-03-05 14:30:00")),
        Some(at(2024, 3, 5, 14, 30))
    );
}

#[test]
fn parses_postgres_offset_keeping_wall_time() {
    assert_eq!(
        parse_datetime(&json!("2024-03-05 14:30:00-07")),
        Some(at(2024, 3, 5, 14, 30))
    );
}

#[test]
fn parses_rfc3339() {
    assert_eq!(
        parse_datetime(&json!("2024-03-05T14:30:00+02:00")),
        Some(at(2024, 3, 5, 14, 30))
    );
}

#[test]
fn parses_date_only_as_midnight() {
    assert_eq!(parse_datetime(&json!("2024-03-05")), Some(at(2024, 3, 5, 0, 0)));
    assert_eq!(parse_datetime(&json!("3/5/2024")), Some(at(2024, 3, 5, 0, 0)));
}

#[test]
fn parses_us_timestamp() {
    assert_eq!(
        parse_datetime(&json!("03/05/2024 02:30 PM")),
        Some(at(2024, 3, 5, 14, 30))
    );
}

#[test]
fn parses_epoch_seconds_and_millis() {
    let expected = at(2024, 3, 5, 14, 30);
    let secs = expected.and_local_timezone(Local).single().unwrap().timestamp();
    assert_eq!(parse_datetime(&json!(secs)), Some(expected));
    assert_eq!(parse_datetime(&json!(secs * 1000)), Some(expected));
}

#[test]
fn epoch_is_read_in_local_time() {
    let secs = 1_760_832_000;
    let expected = DateTime::from_timestamp(secs, 0)
        .unwrap()
        .with_timezone(&Local)
        .naive_local();
    assert_eq!(parse_datetime(&json!(secs)), Some(expected));
}

#[test]
fn extreme_epochs_are_rejected_without_overflow() {
    assert_eq!(parse_datetime(&json!(-1e30)), None);
    assert_eq!(parse_datetime(&json!(1e30)), None);
    assert_eq!(parse_datetime(&json!(i64::MIN)), None);
}

#[test]
fn rejects_empty_and_garbage() {
    assert_eq!(parse_datetime(&json!("")), None);
    assert_eq!(parse_datetime(&json!("next tuesday")), None);
    assert_eq!(parse_datetime(&json!(null)), None);
}

// ── Formatting ───────────────────────────────────────────────────

#[test]
fn short_date_is_unpadded() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(format_short_date(date), "3/5/2024");
}

#[test]
fn time_of_day_uses_twelve_hour_clock() {
    assert_eq!(format_time_of_day(NaiveTime::from_hms_opt(14, 5, 0).unwrap()), "2:05 PM");
    assert_eq!(format_time_of_day(NaiveTime::from_hms_opt(0, 15, 0).unwrap()), "12:15 AM");
    assert_eq!(format_time_of_day(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), "12:00 PM");
}
