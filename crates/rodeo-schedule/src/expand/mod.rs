//! Occurrence expansion.
//!
//! Performance blocks are reduced to offsets from the earliest block start
//! (the anchor). Recurrence then generates series starts beginning at the
//! anchor, and every offset is replayed at every series start. All arithmetic
//! is naive local date-time arithmetic.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;

use crate::calendar::{day_in_month, end_of_day, nth_weekday_of_month, shift_month, weekday_ordinal};
use crate::model::{EndMode, Occurrence, PerformanceBlock, RecurrenceKind, RecurrenceSpec};
use crate::parse::{parse_local_date, parse_local_date_time};

/// ## Summary
/// Maximum number of series starts for an open-ended (`NEVER`) recurrence.
pub const NEVER_SERIES_CAP: usize = 52;

/// ## Summary
/// Upper bound on series starts for any recurrence, including far-off end dates.
pub const MAX_SERIES_STARTS: usize = 10_000;

/// Upper bound on candidate months scanned by monthly recurrence.
const MAX_MONTH_SCAN: u32 = 1_200;

/// Offset of one performance block from the anchor.
#[derive(Debug, Clone, Copy)]
struct BlockOffset {
    start: TimeDelta,
    end: TimeDelta,
}

/// Termination rule applied to each generated candidate.
#[derive(Debug, Clone, Copy)]
struct SeriesBound {
    limit: usize,
    until: Option<NaiveDateTime>,
}

impl SeriesBound {
    /// Builds the bound for a repeating recurrence.
    ///
    /// Returns `None` when the series is bounded by an end date that does not
    /// parse; the caller then keeps only the anchor.
    fn for_spec(recurrence: &RecurrenceSpec) -> Option<Self> {
        match recurrence.end_mode {
            EndMode::Count => Some(Self {
                limit: usize::try_from(recurrence.effective_count())
                    .unwrap_or(MAX_SERIES_STARTS)
                    .min(MAX_SERIES_STARTS),
                until: None,
            }),
            EndMode::Never => Some(Self {
                limit: NEVER_SERIES_CAP,
                until: None,
            }),
            EndMode::Date => {
                let end_date = parse_local_date(recurrence.end_date.as_deref()?)?;
                Some(Self {
                    limit: MAX_SERIES_STARTS,
                    until: Some(end_of_day(end_date)?),
                })
            }
        }
    }

    fn admits(&self, generated: usize, candidate: NaiveDateTime) -> bool {
        generated < self.limit && self.until.is_none_or(|until| candidate <= until)
    }
}

/// ## Summary
/// Expands performance blocks and a recurrence into concrete occurrences.
///
/// The result is sorted ascending by start and contains no duplicate
/// `(start, end)` pairs. Blocks whose components do not parse, or whose end is
/// not after their start, are dropped. If no block survives the result is
/// empty; rejecting an empty schedule is left to the caller.
#[must_use]
#[tracing::instrument(skip_all, fields(blocks = performances.len(), kind = ?recurrence.kind))]
pub fn expand_occurrences(
    performances: &[PerformanceBlock],
    recurrence: &RecurrenceSpec,
) -> Vec<Occurrence> {
    let blocks = parse_blocks(performances);

    let Some(anchor) = blocks.iter().map(|block| block.start).min() else {
        tracing::debug!("No valid performance blocks, nothing to expand");
        return Vec::new();
    };

    let offsets: Vec<BlockOffset> = blocks
        .iter()
        .map(|block| BlockOffset {
            start: block.start - anchor,
            end: block.end - anchor,
        })
        .collect();

    let series = series_starts(anchor, recurrence);
    let occurrences = apply_offsets(&series, &offsets);

    tracing::debug!(
        anchor = %anchor,
        series = series.len(),
        occurrences = occurrences.len(),
        "Expanded schedule"
    );

    occurrences
}

fn parse_blocks(performances: &[PerformanceBlock]) -> Vec<Occurrence> {
    performances
        .iter()
        .filter_map(|block| {
            let start = parse_local_date_time(&block.date, &block.start_time);
            let end = parse_local_date_time(&block.date, &block.end_time);
            match (start, end) {
                (Some(start), Some(end)) if end > start => Some(Occurrence { start, end }),
                _ => {
                    tracing::trace!(?block, "Dropping unusable performance block");
                    None
                }
            }
        })
        .collect()
}

/// Generates series starts, the anchor first.
fn series_starts(anchor: NaiveDateTime, recurrence: &RecurrenceSpec) -> Vec<NaiveDateTime> {
    let mut starts = vec![anchor];

    match recurrence.kind {
        RecurrenceKind::None => {}
        RecurrenceKind::Custom => {
            let time = minute_of(anchor);
            starts.extend(recurrence.custom_dates.iter().filter_map(|date| {
                let parsed = parse_local_date(date);
                if parsed.is_none() {
                    tracing::trace!(date = %date, "Dropping unparseable custom date");
                }
                parsed.map(|date| date.and_time(time))
            }));
        }
        RecurrenceKind::Weekly
        | RecurrenceKind::Biweekly
        | RecurrenceKind::MonthlyDate
        | RecurrenceKind::MonthlyDay => {
            let Some(bound) = SeriesBound::for_spec(recurrence) else {
                tracing::debug!(
                    end_date = ?recurrence.end_date,
                    "End date missing or invalid, keeping only the anchor"
                );
                return starts;
            };
            let interval = recurrence.effective_interval();

            match recurrence.kind {
                RecurrenceKind::Weekly => weekly_series(&mut starts, anchor, 7, interval, bound),
                RecurrenceKind::Biweekly => weekly_series(&mut starts, anchor, 14, interval, bound),
                RecurrenceKind::MonthlyDate => {
                    let day = anchor.day();
                    monthly_series(&mut starts, anchor, interval, bound, |year, month| {
                        day_in_month(year, month, day)
                    });
                }
                RecurrenceKind::MonthlyDay => {
                    let weekday = anchor.weekday();
                    let nth = weekday_ordinal(anchor.date());
                    monthly_series(&mut starts, anchor, interval, bound, |year, month| {
                        nth_weekday_of_month(year, month, weekday, nth)
                    });
                }
                RecurrenceKind::None | RecurrenceKind::Custom => {}
            }
        }
    }

    starts
}

/// Anchor time of day truncated to the minute.
fn minute_of(anchor: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(anchor.hour(), anchor.minute(), 0).unwrap_or(NaiveTime::MIN)
}

fn weekly_series(
    starts: &mut Vec<NaiveDateTime>,
    anchor: NaiveDateTime,
    base_days: i64,
    interval: u32,
    bound: SeriesBound,
) {
    let step = TimeDelta::days(base_days * i64::from(interval));
    let mut next = anchor.checked_add_signed(step);

    while let Some(candidate) = next {
        if !bound.admits(starts.len(), candidate) {
            break;
        }
        tracing::trace!(series_start = %candidate, "Weekly series start");
        starts.push(candidate);
        next = candidate.checked_add_signed(step);
    }
}

fn monthly_series(
    starts: &mut Vec<NaiveDateTime>,
    anchor: NaiveDateTime,
    interval: u32,
    bound: SeriesBound,
    resolve_day: impl Fn(i32, u32) -> Option<NaiveDate>,
) {
    let time = minute_of(anchor);
    let (mut year, mut month) = (anchor.year(), anchor.month());

    for _ in 0..MAX_MONTH_SCAN {
        (year, month) = shift_month(year, month, interval);

        let Some(date) = resolve_day(year, month) else {
            tracing::trace!(year, month, "Skipping month without a matching day");
            continue;
        };

        let candidate = date.and_time(time);
        if !bound.admits(starts.len(), candidate) {
            break;
        }
        tracing::trace!(series_start = %candidate, "Monthly series start");
        starts.push(candidate);
    }
}

/// Replays every offset at every series start, keeping the first of any
/// identical `(start, end)` pairs, then sorts by start.
fn apply_offsets(series: &[NaiveDateTime], offsets: &[BlockOffset]) -> Vec<Occurrence> {
    let mut seen = HashSet::new();
    let mut occurrences = Vec::with_capacity(series.len() * offsets.len());

    for series_start in series {
        for offset in offsets {
            let (Some(start), Some(end)) = (
                series_start.checked_add_signed(offset.start),
                series_start.checked_add_signed(offset.end),
            ) else {
                continue;
            };
            let occurrence = Occurrence { start, end };
            if seen.insert(occurrence) {
                occurrences.push(occurrence);
            }
        }
    }

    occurrences.sort_by_key(|occurrence| occurrence.start);
    occurrences
}

/// ## Summary
/// Live preview of what a submission would create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrencePreview {
    pub count: usize,
    pub occurrences: Vec<Occurrence>,
}

impl OccurrencePreview {
    /// Expands the current form state into a preview.
    #[must_use]
    pub fn build(performances: &[PerformanceBlock], recurrence: &RecurrenceSpec) -> Self {
        let occurrences = expand_occurrences(performances, recurrence);
        Self {
            count: occurrences.len(),
            occurrences,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

#[cfg(test)]
mod tests;
