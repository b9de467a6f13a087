//! Parsing of form-entered local dates and times.
//!
//! Parsing is lenient about surrounding whitespace and strict about
//! everything else: any non-numeric component, a zero year/month/day, or a
//! date that does not exist on the calendar yields `None`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

fn parse_component(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// ## Summary
/// Parses a `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_local_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().split('-');
    let year = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;
    if parts.next().is_some() || year == 0 || month == 0 || day == 0 {
        return None;
    }

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// ## Summary
/// Parses an `HH:MM` time of day. A trailing `:SS` component is accepted and
/// ignored, matching what browser time inputs may submit.
#[must_use]
pub fn parse_local_time(time: &str) -> Option<NaiveTime> {
    let mut parts = time.trim().split(':');
    let hour = parse_component(parts.next()?)?;
    let minute = parse_component(parts.next()?)?;
    if let Some(seconds) = parts.next() {
        parse_component(seconds)?;
    }
    if parts.next().is_some() {
        return None;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// ## Summary
/// Combines a `YYYY-MM-DD` date and an `HH:MM` time into a naive local
/// date-time.
#[must_use]
pub fn parse_local_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_local_date(date)?.and_time(parse_local_time(time)?))
}
