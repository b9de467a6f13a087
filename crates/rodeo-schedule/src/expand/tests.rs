//! Tests for occurrence expansion.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};

use super::*;
use crate::calendar::weekday_ordinal;

fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn block(date: &str, start: &str, end: &str) -> PerformanceBlock {
    PerformanceBlock::new(date, start, end)
}

fn starts(occurrences: &[Occurrence]) -> Vec<NaiveDateTime> {
    occurrences.iter().map(|occurrence| occurrence.start).collect()
}

#[test_log::test]
fn test_single_block_without_recurrence() {
    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::none(),
    );

    assert_eq!(
        occurrences,
        vec![Occurrence {
            start: dt(2024, 1, 1, 18, 0),
            end: dt(2024, 1, 1, 20, 0),
        }]
    );
}

#[test]
fn test_empty_input_yields_nothing() {
    assert!(expand_occurrences(&[], &RecurrenceSpec::new(RecurrenceKind::Weekly)).is_empty());
}

#[test]
fn test_invalid_blocks_are_dropped() {
    let performances = [
        block("2024-01-01", "20:00", "18:00"),
        block("2024-01-01", "18:00", "18:00"),
        block("not-a-date", "18:00", "20:00"),
        block("2024-01-02", "aa:00", "20:00"),
    ];
    assert!(expand_occurrences(&performances, &RecurrenceSpec::none()).is_empty());

    let mut with_valid = performances.to_vec();
    with_valid.push(block("2024-01-03", "09:00", "10:00"));
    let occurrences = expand_occurrences(&with_valid, &RecurrenceSpec::none());
    assert_eq!(starts(&occurrences), vec![dt(2024, 1, 3, 9, 0)]);
}

#[test_log::test]
fn test_weekly_count_four() {
    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).with_count(4),
    );

    assert_eq!(occurrences.len(), 4);
    for pair in occurrences.windows(2) {
        assert_eq!(pair[1].start - pair[0].start, TimeDelta::days(7));
    }
    for occurrence in &occurrences {
        assert_eq!(occurrence.duration(), TimeDelta::hours(2));
        assert_eq!(occurrence.start.weekday(), Weekday::Mon);
    }
    assert_eq!(occurrences[3].start, dt(2024, 1, 22, 18, 0));
}

#[test]
fn test_weekly_interval_multiplies_step() {
    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly)
            .with_interval(3)
            .with_count(3),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 1, 1, 18, 0),
            dt(2024, 1, 22, 18, 0),
            dt(2024, 2, 12, 18, 0),
        ]
    );
}

#[test]
fn test_biweekly_steps_fourteen_days() {
    let occurrences = expand_occurrences(
        &[block("2024-01-05", "19:00", "22:00")],
        &RecurrenceSpec::new(RecurrenceKind::Biweekly).with_count(3),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 1, 5, 19, 0),
            dt(2024, 1, 19, 19, 0),
            dt(2024, 2, 2, 19, 0),
        ]
    );
}

#[test]
fn test_zero_interval_and_count_are_clamped() {
    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly)
            .with_interval(0)
            .with_count(0),
    );
    assert_eq!(starts(&occurrences), vec![dt(2024, 1, 1, 18, 0)]);

    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly)
            .with_interval(0)
            .with_count(2),
    );
    assert_eq!(
        starts(&occurrences),
        vec![dt(2024, 1, 1, 18, 0), dt(2024, 1, 8, 18, 0)]
    );
}

#[test]
fn test_monthly_date_skips_short_months() {
    let occurrences = expand_occurrences(
        &[block("2024-01-31", "10:00", "12:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDate).with_count(3),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 1, 31, 10, 0),
            dt(2024, 3, 31, 10, 0),
            dt(2024, 5, 31, 10, 0),
        ]
    );
}

#[test]
fn test_monthly_date_interval_and_year_rollover() {
    let occurrences = expand_occurrences(
        &[block("2024-01-31", "10:00", "12:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDate)
            .with_interval(2)
            .with_count(5),
    );

    // September and November have 30 days.
    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 1, 31, 10, 0),
            dt(2024, 3, 31, 10, 0),
            dt(2024, 5, 31, 10, 0),
            dt(2024, 7, 31, 10, 0),
            dt(2025, 1, 31, 10, 0),
        ]
    );

    let occurrences = expand_occurrences(
        &[block("2024-11-15", "10:00", "12:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDate).with_count(3),
    );
    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 11, 15, 10, 0),
            dt(2024, 12, 15, 10, 0),
            dt(2025, 1, 15, 10, 0),
        ]
    );
}

#[test]
fn test_monthly_date_leap_day() {
    let occurrences = expand_occurrences(
        &[block("2024-02-29", "10:00", "12:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDate)
            .with_interval(12)
            .with_count(2),
    );

    assert_eq!(
        starts(&occurrences),
        vec![dt(2024, 2, 29, 10, 0), dt(2028, 2, 29, 10, 0)]
    );
}

#[test_log::test]
fn test_monthly_day_third_thursday() {
    // 2024-01-18 is the third Thursday of January.
    let occurrences = expand_occurrences(
        &[block("2024-01-18", "19:00", "21:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDay).with_count(12),
    );

    assert_eq!(occurrences.len(), 12);
    for (index, occurrence) in occurrences.iter().enumerate() {
        let date = occurrence.start.date();
        assert_eq!(date.weekday(), Weekday::Thu);
        assert_eq!(weekday_ordinal(date), 3);
        assert_eq!(usize::try_from(date.month0()).unwrap(), index);
        assert_eq!(occurrence.duration(), TimeDelta::hours(2));
    }
}

#[test]
fn test_monthly_day_skips_months_without_fifth_weekday() {
    // 2024-06-29 is the fifth Saturday of June; July, September and October
    // 2024 have only four Saturdays.
    let occurrences = expand_occurrences(
        &[block("2024-06-29", "13:00", "16:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDay).with_count(3),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 6, 29, 13, 0),
            dt(2024, 8, 31, 13, 0),
            dt(2024, 11, 30, 13, 0),
        ]
    );
}

#[test]
fn test_end_date_is_inclusive() {
    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).until("2024-01-22"),
    );
    assert_eq!(occurrences.len(), 4);
    assert_eq!(occurrences[3].start, dt(2024, 1, 22, 18, 0));

    let occurrences = expand_occurrences(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).until("2024-01-21"),
    );
    assert_eq!(occurrences.len(), 3);
}

#[test]
fn test_end_date_bounds_monthly_skips() {
    let occurrences = expand_occurrences(
        &[block("2024-01-31", "10:00", "12:00")],
        &RecurrenceSpec::new(RecurrenceKind::MonthlyDate).until("2024-06-30"),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 1, 31, 10, 0),
            dt(2024, 3, 31, 10, 0),
            dt(2024, 5, 31, 10, 0),
        ]
    );
}

#[test]
fn test_invalid_end_date_keeps_only_anchor() {
    let performances = [block("2024-01-01", "18:00", "20:00")];

    let occurrences = expand_occurrences(
        &performances,
        &RecurrenceSpec::new(RecurrenceKind::Weekly).until("someday"),
    );
    assert_eq!(starts(&occurrences), vec![dt(2024, 1, 1, 18, 0)]);

    let mut missing = RecurrenceSpec::new(RecurrenceKind::MonthlyDay);
    missing.end_mode = EndMode::Date;
    let occurrences = expand_occurrences(&performances, &missing);
    assert_eq!(starts(&occurrences), vec![dt(2024, 1, 1, 18, 0)]);
}

#[test]
fn test_never_is_capped() {
    let performances = [block("2024-01-31", "18:00", "20:00")];

    for spec in [
        RecurrenceSpec::new(RecurrenceKind::Weekly),
        RecurrenceSpec::new(RecurrenceKind::Biweekly).with_interval(3),
        RecurrenceSpec::new(RecurrenceKind::MonthlyDate),
        RecurrenceSpec::new(RecurrenceKind::MonthlyDay).with_interval(2),
    ] {
        let occurrences = expand_occurrences(&performances, &spec);
        assert_eq!(occurrences.len(), NEVER_SERIES_CAP, "{:?}", spec.kind);
    }
}

#[test]
fn test_two_blocks_keep_their_offset() {
    let occurrences = expand_occurrences(
        &[
            block("2024-03-02", "13:00", "15:00"),
            block("2024-03-02", "17:00", "19:00"),
        ],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).with_count(2),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 3, 2, 13, 0),
            dt(2024, 3, 2, 17, 0),
            dt(2024, 3, 9, 13, 0),
            dt(2024, 3, 9, 17, 0),
        ]
    );
    for pair in occurrences.chunks(2) {
        assert_eq!(pair[1].start - pair[0].start, TimeDelta::hours(4));
    }
}

#[test]
fn test_multi_day_blocks_anchor_on_earliest() {
    // Listed out of order; Friday night is the anchor.
    let occurrences = expand_occurrences(
        &[
            block("2024-05-04", "13:00", "16:00"),
            block("2024-05-03", "19:00", "22:00"),
        ],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).with_count(2),
    );

    assert_eq!(
        starts(&occurrences),
        vec![
            dt(2024, 5, 3, 19, 0),
            dt(2024, 5, 4, 13, 0),
            dt(2024, 5, 10, 19, 0),
            dt(2024, 5, 11, 13, 0),
        ]
    );
}

#[test]
fn test_custom_dates_use_anchor_time() {
    let occurrences = expand_occurrences(
        &[block("2024-04-06", "18:30", "21:00")],
        &RecurrenceSpec::new(RecurrenceKind::Custom)
            .with_custom_date("2024-05-11")
            .with_custom_date("2024-04-20"),
    );

    assert_eq!(
        occurrences,
        vec![
            Occurrence {
                start: dt(2024, 4, 6, 18, 30),
                end: dt(2024, 4, 6, 21, 0),
            },
            Occurrence {
                start: dt(2024, 4, 20, 18, 30),
                end: dt(2024, 4, 20, 21, 0),
            },
            Occurrence {
                start: dt(2024, 5, 11, 18, 30),
                end: dt(2024, 5, 11, 21, 0),
            },
        ]
    );
}

#[test]
fn test_custom_date_matching_anchor_is_deduplicated() {
    let occurrences = expand_occurrences(
        &[block("2024-04-06", "18:30", "21:00")],
        &RecurrenceSpec::new(RecurrenceKind::Custom)
            .with_custom_date("2024-04-06")
            .with_custom_date("2024-04-06"),
    );

    assert_eq!(occurrences.len(), 1);
}

#[test]
fn test_invalid_custom_dates_are_dropped() {
    let occurrences = expand_occurrences(
        &[block("2024-04-06", "18:30", "21:00")],
        &RecurrenceSpec::new(RecurrenceKind::Custom)
            .with_custom_date("2024-13-01")
            .with_custom_date("")
            .with_custom_date("2024-04-13"),
    );

    assert_eq!(
        starts(&occurrences),
        vec![dt(2024, 4, 6, 18, 30), dt(2024, 4, 13, 18, 30)]
    );
}

#[test]
fn test_custom_ignores_end_mode() {
    let occurrences = expand_occurrences(
        &[block("2024-04-06", "18:30", "21:00")],
        &RecurrenceSpec::new(RecurrenceKind::Custom)
            .until("garbage")
            .with_custom_date("2024-04-13"),
    );

    assert_eq!(occurrences.len(), 2);
}

#[test]
fn test_identical_blocks_collapse() {
    let occurrences = expand_occurrences(
        &[
            block("2024-04-06", "18:30", "21:00"),
            block("2024-04-06", "18:30", "21:00"),
        ],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).with_count(2),
    );

    assert_eq!(occurrences.len(), 2);
}

#[test]
fn test_same_start_different_end_keeps_input_order() {
    let occurrences = expand_occurrences(
        &[
            block("2024-04-06", "18:00", "21:00"),
            block("2024-04-06", "18:00", "19:00"),
        ],
        &RecurrenceSpec::none(),
    );

    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].end, dt(2024, 4, 6, 21, 0));
    assert_eq!(occurrences[1].end, dt(2024, 4, 6, 19, 0));
}

#[test]
fn test_expansion_is_deterministic() {
    let performances = [
        block("2024-05-04", "13:00", "16:00"),
        block("2024-05-03", "19:00", "22:00"),
    ];
    let recurrence = RecurrenceSpec::new(RecurrenceKind::MonthlyDay).until("2025-05-31");

    let first = expand_occurrences(&performances, &recurrence);
    let second = expand_occurrences(&performances, &recurrence);
    assert_eq!(first, second);
    assert!(first.windows(2).all(|pair| pair[0].start <= pair[1].start));
}

#[test]
fn test_preview_counts_occurrences() {
    let preview = OccurrencePreview::build(
        &[block("2024-01-01", "18:00", "20:00")],
        &RecurrenceSpec::new(RecurrenceKind::Weekly).with_count(4),
    );
    assert_eq!(preview.count, 4);
    assert_eq!(preview.occurrences.len(), 4);
    assert!(!preview.is_empty());

    let empty = OccurrencePreview::build(&[], &RecurrenceSpec::none());
    assert_eq!(empty.count, 0);
    assert!(empty.is_empty());
}

#[test]
fn test_recurrence_spec_deserializes_wire_form() {
    let spec: RecurrenceSpec = serde_json::from_str(
        r#"{"type":"MONTHLY_DAY","interval":2,"endMode":"COUNT","count":6}"#,
    )
    .unwrap();
    assert_eq!(spec.kind, RecurrenceKind::MonthlyDay);
    assert_eq!(spec.interval, 2);
    assert_eq!(spec.end_mode, EndMode::Count);
    assert_eq!(spec.count, 6);
    assert!(spec.custom_dates.is_empty());

    let spec: RecurrenceSpec = serde_json::from_str(r#"{"type":"NONE"}"#).unwrap();
    assert_eq!(spec, RecurrenceSpec::none());
}
