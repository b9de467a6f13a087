use salvo::{Request, Response, handler, http::StatusCode, writing::Json};
use serde::Deserialize;

use rodeo_schedule::{PerformanceBlock, RecurrenceSpec};
use rodeo_service::event::preview_submission;

use super::ErrorResponse;

/// ## Summary
/// Schedule portion of the submission form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewRequest {
    pub performances: Vec<PerformanceBlock>,
    pub recurrence: RecurrenceSpec,
}

/// ## Summary
/// POST /api/events/preview - Expand the form's schedule without saving it
///
/// ## Errors
/// Returns HTTP 400 if the body is not a valid schedule.
#[handler]
pub async fn preview(req: &mut Request, res: &mut Response) {
    let body: PreviewRequest = match req.parse_json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to parse preview request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid request body")));
            return;
        }
    };

    let expanded = preview_submission(&body.performances, &body.recurrence);
    tracing::debug!(count = expanded.count, "Previewed schedule");

    res.render(Json(expanded));
}
