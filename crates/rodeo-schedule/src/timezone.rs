//! Timezone resolution and UTC conversion for expanded occurrences.
//!
//! Expansion runs on naive local date-times. Only when occurrences are handed
//! to persistence are they interpreted in the submission's IANA timezone.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::str::FromStr;

use crate::model::Occurrence;

pub use rodeo_core::constants::DEFAULT_EVENT_TIMEZONE;

/// Error during timezone conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or unsupported timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap, even after shifting forward.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),

    /// The occurrence collapsed to an empty interval once localized.
    #[error("Occurrence ends before it starts in {tzid}: {start} - {end}")]
    EmptyInterval {
        tzid: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// A selectable event timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimezoneOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Timezones an event may be declared in.
pub const EVENT_TIMEZONE_OPTIONS: [TimezoneOption; 7] = [
    TimezoneOption {
        value: "America/Los_Angeles",
        label: "Pacific Time (PT)",
    },
    TimezoneOption {
        value: "America/Denver",
        label: "Mountain Time (MT)",
    },
    TimezoneOption {
        value: "America/Chicago",
        label: "Central Time (CT)",
    },
    TimezoneOption {
        value: "America/New_York",
        label: "Eastern Time (ET)",
    },
    TimezoneOption {
        value: "America/Anchorage",
        label: "Alaska Time (AKT)",
    },
    TimezoneOption {
        value: "Pacific/Honolulu",
        label: "Hawaii Time (HT)",
    },
    TimezoneOption {
        value: "UTC",
        label: "UTC",
    },
];

/// ## Summary
/// Returns true if `tzid` is one of [`EVENT_TIMEZONE_OPTIONS`].
#[must_use]
pub fn is_supported_event_timezone(tzid: &str) -> bool {
    let tzid = tzid.trim();
    EVENT_TIMEZONE_OPTIONS
        .iter()
        .any(|option| option.value == tzid)
}

/// ## Summary
/// Resolves a supported event timezone identifier to a `chrono_tz::Tz`.
///
/// ## Errors
///
/// Returns `ConversionError::UnknownTimezone` if the identifier is not a
/// supported event timezone.
pub fn resolve_event_timezone(tzid: &str) -> Result<Tz, ConversionError> {
    let trimmed = tzid.trim();
    if !is_supported_event_timezone(trimmed) {
        return Err(ConversionError::UnknownTimezone(tzid.to_string()));
    }

    Tz::from_str(trimmed).map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))
}

/// ## Summary
/// Converts a local datetime to UTC in the given timezone.
///
/// An ambiguous local time (DST fold) resolves to the earlier instant. A
/// non-existent local time (DST gap) is shifted forward by one hour.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the shifted time still does
/// not exist.
pub fn to_utc(local_time: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = local_time + TimeDelta::hours(1);
            tracing::debug!(
                local = %local_time,
                shifted = %shifted,
                tz = %tz.name(),
                "Local time falls in a DST gap, shifting forward"
            );
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    Ok(dt.with_timezone(&Utc))
                }
                LocalResult::None => Err(ConversionError::NonExistentTime(format!(
                    "{local_time} in timezone {}",
                    tz.name()
                ))),
            }
        }
    }
}

/// An occurrence pinned to absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocalizedOccurrence {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// ## Summary
/// Interprets an occurrence's local start and end in `tz`.
///
/// ## Errors
///
/// Returns an error if either endpoint cannot be converted, or if DST
/// adjustment leaves the end at or before the start.
pub fn localize(occurrence: &Occurrence, tz: Tz) -> Result<LocalizedOccurrence, ConversionError> {
    let start = to_utc(occurrence.start, tz)?;
    let end = to_utc(occurrence.end, tz)?;
    if end <= start {
        return Err(ConversionError::EmptyInterval {
            tzid: tz.name().to_string(),
            start: occurrence.start,
            end: occurrence.end,
        });
    }

    Ok(LocalizedOccurrence { start, end })
}
