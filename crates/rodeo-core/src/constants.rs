/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";

/// Message shown when a submission expands to zero occurrences.
pub const NO_OCCURRENCES_MESSAGE: &str = "Add at least one performance date and time.";

pub const SUBMISSION_ACCEPTED_MESSAGE: &str = "Events submitted for approval.";

/// IANA zone preselected for new events.
pub const DEFAULT_EVENT_TIMEZONE: &str = "America/Denver";
