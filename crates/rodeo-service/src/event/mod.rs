//! Event series submission.
//!
//! A submission carries shared event metadata plus the performance blocks and
//! recurrence entered on the form. It is expanded into occurrences, each
//! occurrence is pinned to the submission's timezone, and one event row is
//! created per occurrence.

use std::collections::HashSet;

use chrono_tz::Tz;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use rodeo_core::constants::NO_OCCURRENCES_MESSAGE;
use rodeo_db::db::EventStore;
use rodeo_db::db::enums::EventStatus;
use rodeo_db::model::event::NewEvent;
use rodeo_schedule::calendar::end_of_day;
use rodeo_schedule::expand::MAX_SERIES_STARTS;
use rodeo_schedule::parse::{parse_local_date, parse_local_date_time};
use rodeo_schedule::timezone::{LocalizedOccurrence, localize, resolve_event_timezone};
use rodeo_schedule::{
    EndMode, OccurrencePreview, PerformanceBlock, RecurrenceKind, RecurrenceSpec,
    expand_occurrences,
};

use crate::error::{ServiceError, ServiceResult};

pub const TITLE_REQUIRED_MESSAGE: &str = "Event title is required.";
pub const VENUE_REQUIRED_MESSAGE: &str = "Select a venue or add a new one.";
pub const TIMEZONE_REQUIRED_MESSAGE: &str = "Timezone is required.";
pub const URL_SCHEME_MESSAGE: &str =
    "Use full URLs starting with https:// or http:// for flyer and website.";
pub const PERFORMANCE_INVALID_MESSAGE: &str = "Add a valid date and time for each performance.";
pub const PERFORMANCE_ORDER_MESSAGE: &str = "Each performance must end after it starts.";
pub const INTERVAL_MIN_MESSAGE: &str = "Recurrence interval must be at least 1.";
pub const END_DATE_REQUIRED_MESSAGE: &str = "Select an end date for the recurrence.";
pub const COUNT_MIN_MESSAGE: &str = "Occurrence count must be at least 1.";
pub const END_DATE_INVALID_MESSAGE: &str = "Select a valid recurrence end date.";
pub const END_DATE_BEFORE_MESSAGE: &str =
    "Recurrence end date must be on or after the last performance.";

/// Form state submitted for a new event or event series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventSubmission {
    pub title: String,
    pub description: Option<String>,
    pub recurrence_note: Option<String>,
    pub venue_id: Option<Uuid>,
    pub timezone: String,
    pub flyer_image_url: Option<String>,
    pub official_website_url: Option<String>,
    pub classes_details: Option<String>,
    pub discipline_ids: Vec<i32>,
    pub sanction_ids: Vec<i32>,
    pub performances: Vec<PerformanceBlock>,
    pub recurrence: RecurrenceSpec,
}

/// Shared columns of every row in a series, trimmed and with blanks dropped.
#[derive(Debug)]
struct SeriesMetadata<'a> {
    title: &'a str,
    description: Option<String>,
    venue_id: Uuid,
    timezone: &'a str,
    flyer_image_url: Option<&'a str>,
    official_website_url: Option<&'a str>,
    classes_details: Option<&'a str>,
}

impl<'a> SeriesMetadata<'a> {
    fn new(submission: &'a EventSubmission, venue_id: Uuid) -> Self {
        Self {
            title: submission.title.trim(),
            description: compose_description(
                submission.description.as_deref(),
                submission.recurrence_note.as_deref(),
            ),
            venue_id,
            timezone: submission.timezone.trim(),
            flyer_image_url: non_blank(submission.flyer_image_url.as_deref()),
            official_website_url: non_blank(submission.official_website_url.as_deref()),
            classes_details: non_blank(submission.classes_details.as_deref()),
        }
    }

    fn row(&self, occurrence: LocalizedOccurrence) -> NewEvent {
        NewEvent {
            id: Uuid::now_v7(),
            title: self.title.to_string(),
            description: self.description.clone(),
            venue_id: self.venue_id,
            start_datetime: occurrence.start,
            end_datetime: occurrence.end,
            timezone: self.timezone.to_string(),
            flyer_image_url: self.flyer_image_url.map(str::to_string),
            official_website_url: self.official_website_url.map(str::to_string),
            classes_details: self.classes_details.map(str::to_string),
            status: EventStatus::Pending,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn invalid<T>(message: impl Into<String>) -> ServiceResult<T> {
    Err(ServiceError::ValidationError(message.into()))
}

/// Blank is allowed; anything else must be an absolute http(s) URL.
fn is_web_url(value: Option<&str>) -> bool {
    non_blank(value).is_none_or(|value| {
        Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    })
}

/// ## Summary
/// Builds the stored description from the free-text description and the
/// optional recurrence note.
///
/// A note is appended as `Recurrence: {note}`, separated from a non-blank
/// description by a blank line. Returns `None` when both are blank.
#[must_use]
pub fn compose_description(
    description: Option<&str>,
    recurrence_note: Option<&str>,
) -> Option<String> {
    let base = non_blank(description);
    match (base, non_blank(recurrence_note)) {
        (Some(base), Some(note)) => Some(format!("{base}\n\nRecurrence: {note}")),
        (None, Some(note)) => Some(format!("Recurrence: {note}")),
        (base, None) => base.map(str::to_string),
    }
}

/// ## Summary
/// Checks a submission before anything is expanded or written.
///
/// Returns the venue and the resolved timezone.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` with a form-ready message if the
/// title is blank, no venue is selected, a link is not an http(s) URL, the
/// timezone is unsupported, or the schedule is unusable (see
/// [`validate_schedule`]).
pub fn validate_submission(submission: &EventSubmission) -> ServiceResult<(Uuid, Tz)> {
    if submission.title.trim().is_empty() {
        return invalid(TITLE_REQUIRED_MESSAGE);
    }

    let Some(venue_id) = submission.venue_id else {
        return invalid(VENUE_REQUIRED_MESSAGE);
    };

    if !is_web_url(submission.flyer_image_url.as_deref())
        || !is_web_url(submission.official_website_url.as_deref())
    {
        return invalid(URL_SCHEME_MESSAGE);
    }

    let tz = resolve_event_timezone(&submission.timezone).map_err(|err| {
        tracing::debug!(error = %err, timezone = %submission.timezone, "Rejected event timezone");
        ServiceError::ValidationError(TIMEZONE_REQUIRED_MESSAGE.to_string())
    })?;

    validate_schedule(&submission.performances, &submission.recurrence)?;

    Ok((venue_id, tz))
}

/// ## Summary
/// Checks performance blocks and recurrence settings.
///
/// Blocks whose date or times do not parse are ignored as long as one block
/// is usable. Interval, end-date-required and count rules apply to repeating
/// kinds only; a `DATE` end date that is present is checked for every kind.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if there are no blocks, no usable
/// block, a block that ends at or before its start, an interval or count
/// below 1, a count above [`MAX_SERIES_STARTS`], or an end date that is
/// missing, unparseable or before the last performance.
pub fn validate_schedule(
    performances: &[PerformanceBlock],
    recurrence: &RecurrenceSpec,
) -> ServiceResult<()> {
    if performances.is_empty() {
        return invalid(NO_OCCURRENCES_MESSAGE);
    }

    let ranges: Vec<_> = performances
        .iter()
        .filter_map(|block| {
            Some((
                parse_local_date_time(&block.date, &block.start_time)?,
                parse_local_date_time(&block.date, &block.end_time)?,
            ))
        })
        .collect();

    let Some(latest_start) = ranges.iter().map(|(start, _)| *start).max() else {
        return invalid(PERFORMANCE_INVALID_MESSAGE);
    };
    if ranges.iter().any(|(start, end)| end <= start) {
        return invalid(PERFORMANCE_ORDER_MESSAGE);
    }

    if recurrence.kind == RecurrenceKind::None {
        return Ok(());
    }

    if recurrence.kind != RecurrenceKind::Custom {
        if recurrence.interval < 1 {
            return invalid(INTERVAL_MIN_MESSAGE);
        }
        match recurrence.end_mode {
            EndMode::Date if non_blank(recurrence.end_date.as_deref()).is_none() => {
                return invalid(END_DATE_REQUIRED_MESSAGE);
            }
            EndMode::Count if recurrence.count < 1 => return invalid(COUNT_MIN_MESSAGE),
            EndMode::Count
                if usize::try_from(recurrence.count).is_ok_and(|count| count > MAX_SERIES_STARTS) =>
            {
                return invalid(format!(
                    "Occurrence count must be at most {MAX_SERIES_STARTS}."
                ));
            }
            EndMode::Date | EndMode::Count | EndMode::Never => {}
        }
    }

    if recurrence.end_mode == EndMode::Date
        && let Some(end_date) = non_blank(recurrence.end_date.as_deref())
    {
        let Some(until) = parse_local_date(end_date).and_then(end_of_day) else {
            return invalid(END_DATE_INVALID_MESSAGE);
        };
        if latest_start > until {
            return invalid(END_DATE_BEFORE_MESSAGE);
        }
    }

    Ok(())
}

/// ## Summary
/// Expands the current form state for the live preview. No validation is
/// applied; an unusable schedule simply previews as empty.
#[must_use]
pub fn preview_submission(
    performances: &[PerformanceBlock],
    recurrence: &RecurrenceSpec,
) -> OccurrencePreview {
    OccurrencePreview::build(performances, recurrence)
}

/// Pins occurrences to `tz`, dropping any that land on an instant pair
/// already seen (distinct local times can collide inside a DST gap).
fn localize_all(
    occurrences: &[rodeo_schedule::Occurrence],
    tz: Tz,
) -> ServiceResult<Vec<LocalizedOccurrence>> {
    let mut seen = HashSet::with_capacity(occurrences.len());
    let mut localized = Vec::with_capacity(occurrences.len());

    for occurrence in occurrences {
        let pinned = localize(occurrence, tz)?;
        if seen.insert(pinned) {
            localized.push(pinned);
        } else {
            tracing::debug!(
                local_start = %occurrence.start,
                start = %pinned.start,
                "Dropping occurrence that collides after localization"
            );
        }
    }

    Ok(localized)
}

/// ## Summary
/// Validates a submission, expands it and creates one pending event per
/// occurrence, in occurrence order.
///
/// Rows are created one at a time. The first failure stops the batch; rows
/// created before it are kept.
///
/// ## Errors
/// - `ServiceError::ValidationError` if validation fails or the schedule
///   expands to no occurrences.
/// - `ServiceError::ConversionError` if an occurrence cannot be placed in the
///   submission's timezone. Nothing is written in that case.
/// - `ServiceError::PartialSubmission` if the store fails, carrying how many
///   rows were created before the failure.
#[tracing::instrument(skip_all, fields(
    title = %submission.title.trim(),
    timezone = %submission.timezone,
    performances = submission.performances.len(),
    kind = ?submission.recurrence.kind,
))]
pub async fn submit_event_series(
    store: &dyn EventStore,
    submission: &EventSubmission,
) -> ServiceResult<Vec<Uuid>> {
    let (venue_id, tz) = validate_submission(submission)?;

    let occurrences = expand_occurrences(&submission.performances, &submission.recurrence);
    if occurrences.is_empty() {
        return invalid(NO_OCCURRENCES_MESSAGE);
    }

    let localized = localize_all(&occurrences, tz)?;

    let metadata = SeriesMetadata::new(submission, venue_id);
    let total = localized.len();
    let mut created = Vec::with_capacity(total);

    tracing::debug!(total, "Creating event series");

    for occurrence in localized {
        match store
            .create_event(
                metadata.row(occurrence),
                &submission.discipline_ids,
                &submission.sanction_ids,
            )
            .await
        {
            Ok(id) => {
                tracing::trace!(%id, start = %occurrence.start, "Created event");
                created.push(id);
            }
            Err(source) => {
                tracing::error!(
                    error = %source,
                    created = created.len(),
                    total,
                    "Event series halted, created rows are kept"
                );
                return Err(ServiceError::PartialSubmission {
                    created: created.len(),
                    total,
                    source,
                });
            }
        }
    }

    tracing::info!(created = created.len(), "Event series submitted for approval");

    Ok(created)
}
