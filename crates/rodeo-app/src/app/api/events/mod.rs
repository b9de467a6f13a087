//! Event scheduling endpoints under `/api/events`.

use salvo::Router;
use serde::Serialize;

use rodeo_core::constants::EVENTS_ROUTE_COMPONENT;

mod preview;
mod submit;
mod timezones;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Rows already created when a series submission stopped partway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<usize>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            created: None,
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .post(submit::submit)
        .push(Router::with_path("preview").post(preview::preview))
        .push(Router::with_path("timezones").get(timezones::timezones))
}
