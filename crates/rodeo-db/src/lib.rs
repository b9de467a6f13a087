//! Event persistence on PostgreSQL via diesel-async.

pub mod db;
pub mod error;
pub mod model;
