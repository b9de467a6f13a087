//! Event submission workflows on top of schedule expansion and persistence.

pub mod error;
pub mod event;
