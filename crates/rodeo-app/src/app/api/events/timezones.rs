use salvo::{Depot, Response, handler, writing::Json};
use serde::Serialize;

use rodeo_schedule::timezone::{
    DEFAULT_EVENT_TIMEZONE, EVENT_TIMEZONE_OPTIONS, TimezoneOption, is_supported_event_timezone,
};

use crate::depot::settings_from_depot;

#[derive(Debug, Serialize)]
pub struct TimezonesResponse {
    pub default: String,
    pub options: &'static [TimezoneOption],
}

/// ## Summary
/// GET /api/events/timezones - Timezones an event may be declared in
#[handler]
pub async fn timezones(depot: &mut Depot, res: &mut Response) {
    let default = settings_from_depot(depot)
        .ok()
        .map(|settings| settings.events.default_timezone.clone())
        .filter(|tzid| is_supported_event_timezone(tzid))
        .unwrap_or_else(|| DEFAULT_EVENT_TIMEZONE.to_string());

    res.render(Json(TimezonesResponse {
        default,
        options: &EVENT_TIMEZONE_OPTIONS,
    }));
}
