//! HTTP surface for event scheduling.

pub mod app;
pub mod depot;
pub mod error;
