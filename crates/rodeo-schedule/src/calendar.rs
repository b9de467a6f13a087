//! Calendar arithmetic used by monthly recurrence.
//!
//! Months are 1-based throughout. Helpers that resolve a day return `None`
//! when the target day does not exist in the month; callers skip the month
//! rather than clamping.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// ## Summary
/// Advances `(year, month)` by `months`, carrying into the year.
#[must_use]
pub fn shift_month(year: i32, month: u32, months: u32) -> (i32, u32) {
    let total = month.saturating_sub(1).saturating_add(months);
    let years = i32::try_from(total / 12).unwrap_or(i32::MAX);
    (year.saturating_add(years), total % 12 + 1)
}

/// ## Summary
/// Resolves `day` within the given month, or `None` if the month is too short.
#[must_use]
pub fn day_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// ## Summary
/// Number of days in the given month, or `None` for an invalid month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = shift_month(year, month, 1);
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    u32::try_from(next_first.signed_duration_since(first).num_days()).ok()
}

/// ## Summary
/// Ordinal of a date's weekday within its month (1 for the first Saturday,
/// 3 for the third, and so on).
#[must_use]
pub fn weekday_ordinal(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// ## Summary
/// Finds the `nth` occurrence of `weekday` in the given month.
///
/// Returns `None` if `nth` is zero or the month has fewer than `nth` such
/// weekdays (e.g. no 5th Saturday).
#[must_use]
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> Option<NaiveDate> {
    if nth == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let day = 1 + offset + (nth - 1) * 7;
    if day > days_in_month(year, month)? {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// ## Summary
/// Last representable instant of a day (23:59:59.999).
#[must_use]
pub fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    Some(date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?))
}
