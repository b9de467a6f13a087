//! Event schedule expansion.
//!
//! Turns user-entered performance blocks and a recurrence rule into
//! the concrete occurrences that are persisted as individual event rows, and
//! interprets those naive local occurrences in an IANA timezone at the
//! persistence boundary.

pub mod calendar;
pub mod expand;
pub mod model;
pub mod parse;
pub mod timezone;

pub use expand::{OccurrencePreview, expand_occurrences};
pub use model::{EndMode, Occurrence, PerformanceBlock, RecurrenceKind, RecurrenceSpec};
pub use timezone::{ConversionError, LocalizedOccurrence};
