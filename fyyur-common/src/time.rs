//! Timestamp utilities
//!
//! Show start times and listing dates are naive local date-times: the forms
//! submit wall-clock times without an offset and "now" is read from the local
//! clock, so both sides of every past/upcoming comparison share one frame.

use chrono::{Local, NaiveDateTime};

/// Accepted input layouts for submitted start times, tried in order
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Layout used when a timestamp is rendered as plain text
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current local wall-clock time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a submitted start time
///
/// Returns `None` when the value matches none of the accepted layouts.
///
/// # Examples
///
/// ```
/// use fyyur_common::time::parse_start_time;
///
/// assert!(parse_start_time("2019-05-21 21:30:00").is_some());
/// assert!(parse_start_time("2019-05-21T21:30").is_some());
/// assert!(parse_start_time("next tuesday").is_none());
/// ```
pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn display_timestamp(value: &NaiveDateTime) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

/// Display style for [`format_datetime`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    #[default]
    Medium,
}

/// Human-readable date for show listings
///
/// # Examples
///
/// ```
/// use fyyur_common::time::{format_datetime, parse_start_time, DateStyle};
///
/// let when = parse_start_time("2019-05-21 21:30:00").unwrap();
/// assert_eq!(format_datetime(&when, DateStyle::Medium), "Tue 05, 21, 2019 9:30PM");
/// ```
pub fn format_datetime(value: &NaiveDateTime, style: DateStyle) -> String {
    let fmt = match style {
        DateStyle::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DateStyle::Medium => "%a %m, %d, %Y %-I:%M%p",
    };
    value.format(fmt).to_string()
}
