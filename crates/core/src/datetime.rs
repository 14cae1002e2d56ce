//! Date/time conventions shared with the analysis server.
//!
//! The wire format stores timestamps as `"%Y-%m-%d %H:%M:%S"` strings,
//! dates as `"%Y-%m-%d"`, and times of day as `"%H:%M:%S"`.  Everything
//! that crosses the HTTP boundary goes through these helpers so the
//! format lives in exactly one place.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::CoreError;

/// Timestamp wire format (`2018-01-25 00:25:00`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date-only wire format (`2018-01-25`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Time-of-day wire format (`06:00:00`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parse a wire timestamp string.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, CoreError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| CoreError::Parse(format!("invalid datetime {s:?}: {e}")))
}

/// Format a timestamp into the wire format.
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a wire date string.
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| CoreError::Parse(format!("invalid date {s:?}: {e}")))
}

/// Parse a wire time-of-day string.
pub fn parse_time(s: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| CoreError::Parse(format!("invalid time {s:?}: {e}")))
}

/// Comma-separated year list covering `[start_year, end_year]`,
/// e.g. `years_string(2017, 2019) == "2017,2018,2019"`.
///
/// Stored denormalized on entities so the server can filter list-by-year
/// requests with a plain substring match.
pub fn years_string(start_year: i32, end_year: i32) -> String {
    (start_year..=end_year)
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Year list for a start/end timestamp pair in wire format.
pub fn years_of_range(start_time: &str, end_time: &str) -> Result<String, CoreError> {
    let start = parse_datetime(start_time)?;
    let end = parse_datetime(end_time)?;
    Ok(years_string(start.year(), end.year()))
}

/// Compact duration label for list panels, e.g. `"2018-01-25 ~ 27"`.
///
/// The end side only repeats the components that differ from the start:
/// same month keeps the day, same year keeps month-day, otherwise the
/// full date is shown.
pub fn duration_label(start_time: &str, end_time: &str) -> Result<String, CoreError> {
    let start = parse_datetime(start_time)?;
    let end = parse_datetime(end_time)?;

    let start_str = format!("{:04}-{:02}-{:02}", start.year(), start.month(), start.day());
    let end_str = if start.year() == end.year() && start.month() == end.month() {
        format!("{:02}", end.day())
    } else if start.year() == end.year() {
        format!("{:02}-{:02}", end.month(), end.day())
    } else {
        format!("{:04}-{:02}-{:02}", end.year(), end.month(), end.day())
    };

    Ok(format!("{start_str} ~ {end_str}"))
}

/// Check that `start_time` is strictly before `end_time` (both wire
/// timestamps).
pub fn check_time_order(start_time: &str, end_time: &str) -> Result<(), CoreError> {
    let start = parse_datetime(start_time)?;
    let end = parse_datetime(end_time)?;
    if start >= end {
        return Err(CoreError::Validation(format!(
            "start time {start_time} is not before end time {end_time}"
        )));
    }
    Ok(())
}
