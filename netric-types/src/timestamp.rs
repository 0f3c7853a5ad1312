//! Parsing and short display formats for entity dates.
//!
//! Date and timestamp fields arrive as server-formatted strings (ISO 8601,
//! Postgres-style `YYYY-MM-DD HH:MM:SS+TZ`, or US `M/D/YYYY`) or as Unix
//! epoch numbers. Offsets are dropped: the wall-clock time as written is what
//! the user saw when the value was entered. Epoch numbers carry no wall-clock
//! time of their own and are rendered in the local zone, matching the local
//! "now" entities compare against.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%#z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Epoch values above this are taken to be milliseconds.
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

/// Parses a date or timestamp field value.
///
/// Returns `None` for empty values and for strings in no known format.
#[must_use]
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_str(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            let (secs, nanos) = if raw.unsigned_abs() > MILLIS_THRESHOLD {
                (raw.div_euclid(1000), (raw.rem_euclid(1000) * 1_000_000) as u32)
            } else {
                (raw, 0)
            };
            Local
                .timestamp_opt(secs, nanos)
                .single()
                .map(|dt| dt.naive_local())
        }
        _ => None,
    }
}

fn parse_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.naive_local());
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Formats a date as `M/D/YYYY` without zero padding.
#[must_use]
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Formats a time of day on a 12-hour clock, e.g. `2:05 PM`.
#[must_use]
pub fn format_time_of_day(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    let suffix = if pm { "PM" } else { "AM" };
    format!("{hour}:{:02} {suffix}", time.minute())
}
