//! # Time Utilities
//!
//! Unix timestamp helpers and the date/time display format used by fills tables.

use chrono::{DateTime, Local, TimeZone, Timelike, Datelike, Utc};

/// Current unix time in whole seconds.
pub fn now_unix_secs() -> i64 {
    Utc::now().timestamp()
}

/// Convert a millisecond timestamp to whole seconds (floor).
pub fn to_unix_secs(millis: i64) -> i64 {
    millis.div_euclid(1000)
}

/// Split a unix timestamp (seconds) into a `M/D/YYYY` date and an `h:MM:SS AM` time,
/// rendered in the local timezone.
pub fn format_date(unix_secs: i64) -> (String, String) {
    match Local.timestamp_opt(unix_secs, 0).single() {
        Some(dt) => format_date_in(dt),
        None => (String::new(), String::new()),
    }
}

/// Same as [`format_date`] for an already-resolved datetime.
pub fn format_date_in<Tz: TimeZone>(dt: DateTime<Tz>) -> (String, String) {
    let date = format!("{}/{}/{}", dt.month(), dt.day(), dt.year());
    let hours = dt.hour();
    let display_hour = if hours % 12 == 0 { 12 } else { hours % 12 };
    let meridiem = if hours < 12 { "AM" } else { "PM" };
    let time = format!(
        "{}:{:02}:{:02} {}",
        display_hour,
        dt.minute(),
        dt.second(),
        meridiem
    );
    (date, time)
}
