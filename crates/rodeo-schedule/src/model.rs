//! Schedule input and output types.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// ## Summary
/// One user-entered schedule slot.
///
/// Components are kept as entered (`YYYY-MM-DD`, `HH:MM`) so that a block
/// with malformed components can be dropped during expansion instead of
/// failing the whole submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBlock {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl PerformanceBlock {
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// How the base performance set repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceKind {
    #[default]
    None,
    Weekly,
    Biweekly,
    /// Same day-of-month.
    MonthlyDate,
    /// Same nth weekday of the month, e.g. "3rd Saturday".
    MonthlyDay,
    /// Explicit list of additional series start dates.
    Custom,
}

/// When a repeating series stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndMode {
    /// Through `end_date`, inclusive of that whole day.
    Date,
    /// For `count` series starts in total.
    Count,
    /// Open ended, capped at [`crate::expand::NEVER_SERIES_CAP`] series starts.
    #[default]
    Never,
}

const fn default_interval() -> u32 {
    1
}

const fn default_count() -> u32 {
    1
}

/// ## Summary
/// Describes how a submission's performance blocks repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceSpec {
    #[serde(rename = "type", default)]
    pub kind: RecurrenceKind,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub end_mode: EndMode,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub custom_dates: Vec<String>,
}

impl Default for RecurrenceSpec {
    fn default() -> Self {
        Self::new(RecurrenceKind::None)
    }
}

impl RecurrenceSpec {
    /// Creates an open-ended recurrence of the given kind with interval 1.
    #[must_use]
    pub fn new(kind: RecurrenceKind) -> Self {
        Self {
            kind,
            interval: default_interval(),
            end_mode: EndMode::Never,
            end_date: None,
            count: default_count(),
            custom_dates: Vec::new(),
        }
    }

    /// A single, non-repeating series.
    #[must_use]
    pub fn none() -> Self {
        Self::new(RecurrenceKind::None)
    }

    /// Sets the interval multiplier.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Ends the series after `count` series starts.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.end_mode = EndMode::Count;
        self.count = count;
        self
    }

    /// Ends the series on `end_date` (`YYYY-MM-DD`), inclusive.
    #[must_use]
    pub fn until(mut self, end_date: impl Into<String>) -> Self {
        self.end_mode = EndMode::Date;
        self.end_date = Some(end_date.into());
        self
    }

    /// Adds an explicit series start date (`YYYY-MM-DD`).
    #[must_use]
    pub fn with_custom_date(mut self, date: impl Into<String>) -> Self {
        self.custom_dates.push(date.into());
        self
    }

    /// Interval clamped to a minimum of 1.
    #[must_use]
    pub fn effective_interval(&self) -> u32 {
        self.interval.max(1)
    }

    /// Count clamped to a minimum of 1.
    #[must_use]
    pub fn effective_count(&self) -> u32 {
        self.count.max(1)
    }
}

/// ## Summary
/// One concrete event instance in naive local time.
///
/// Expansion never attaches a timezone; see [`crate::timezone::localize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Occurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}
