use salvo::{Depot, Request, Response, handler, http::StatusCode, writing::Json};
use serde::Serialize;
use uuid::Uuid;

use rodeo_core::constants::SUBMISSION_ACCEPTED_MESSAGE;
use rodeo_service::error::ServiceError;
use rodeo_service::event::{EventSubmission, submit_event_series};

use super::ErrorResponse;
use crate::depot::store_from_depot;

/// ## Summary
/// Submission response payload
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub created: Vec<Uuid>,
    pub message: &'static str,
}

/// ## Summary
/// POST /api/events - Submit an event or event series for approval
///
/// ## Side Effects
/// - Creates one pending event row per expanded occurrence
///
/// ## Errors
/// Returns HTTP 400 if the body is invalid or fails validation.
/// Returns HTTP 500 if the store is unavailable or a row fails to save; the
/// body then carries how many rows were created first.
#[handler]
pub async fn submit(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let submission: EventSubmission = match req.parse_json().await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to parse event submission");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid request body")));
            return;
        }
    };

    let store = match store_from_depot(depot) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get event store");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    match submit_event_series(store.as_ref(), &submission).await {
        Ok(created) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(SubmitResponse {
                created,
                message: SUBMISSION_ACCEPTED_MESSAGE,
            }));
        }
        Err(e) => {
            let status = if e.is_client_error() {
                tracing::debug!(error = %e, "Rejected event submission");
                StatusCode::BAD_REQUEST
            } else {
                tracing::error!(error = %e, "Event submission failed");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            let created = if let ServiceError::PartialSubmission { created, .. } = &e {
                Some(*created)
            } else {
                None
            };

            res.status_code(status);
            res.render(Json(ErrorResponse {
                error: e.user_message(),
                created,
            }));
        }
    }
}
