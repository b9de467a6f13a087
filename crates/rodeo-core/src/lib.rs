//! Shared configuration, constants and error types for the rodeo workspace.

pub mod config;
pub mod constants;
pub mod error;
