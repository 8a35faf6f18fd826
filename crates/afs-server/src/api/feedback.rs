//! Feedback handlers: moderated submission and per-amendment listing.

use afs_core::{FeedbackSubmission, StoredFeedback};
use afs_moderation::{AcceptedFeedback, FeedbackOutcome, ToxicRejection, ValidationFailure};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    map_db_error, map_json_rejection, normalize_limit, require_amendment, ApiError, ApiResponse,
    AppState,
};

/// Both fields are optional so a missing one is reported as a validation
/// error naming the field.
#[derive(Debug, Deserialize)]
pub(super) struct SubmitFeedbackRequest {
    pub amendment_id: Option<i64>,
    pub original_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedbackQuery {
    pub limit: Option<i64>,
}

impl SubmitFeedbackRequest {
    fn into_submission(self, request_id: &str) -> Result<FeedbackSubmission, ApiError> {
        let amendment_id = self.amendment_id.ok_or_else(|| {
            ApiError::new(request_id, "validation_error", "amendment_id is required")
        })?;
        let original_text = self.original_text.ok_or_else(|| {
            ApiError::new(request_id, "validation_error", "original_text is required")
        })?;
        Ok(FeedbackSubmission {
            amendment_id,
            original_text,
        })
    }
}

/// POST /api/v1/feedback: run a submission through moderation.
pub(super) async fn submit_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AcceptedFeedback>>), ApiError> {
    let rid = req_id.0;
    let Json(body) = payload.map_err(|e| map_json_rejection(rid.clone(), &e))?;
    let submission = body.into_submission(&rid)?;

    let outcome = state
        .pipeline
        .process_feedback(&submission)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %rid,
                amendment_id = submission.amendment_id,
                error = %e,
                "feedback processing failed"
            );
            ApiError::new(&rid, "internal_error", "failed to process feedback")
        })?;

    match outcome {
        FeedbackOutcome::Accepted(accepted) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::ok(rid, accepted).with_message("Feedback submitted successfully")),
        )),
        FeedbackOutcome::Rejected(rejection) => Err(ApiError::new(
            &rid,
            "content_rejected",
            ToxicRejection::MESSAGE,
        )
        .with_data(serde_json::json!({
            "toxic": rejection.toxic,
            "toxic_score": rejection.toxic_score,
        }))),
        FeedbackOutcome::Invalid(failure @ ValidationFailure::InvalidInput(_)) => Err(
            ApiError::new(&rid, "validation_error", failure.to_string()),
        ),
        FeedbackOutcome::Invalid(failure @ ValidationFailure::NotFound(_)) => {
            Err(ApiError::new(&rid, "not_found", failure.to_string()))
        }
    }
}

/// GET /api/v1/amendments/{id}/feedback: newest first.
pub(super) async fn list_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<ApiResponse<Vec<StoredFeedback>>>, ApiError> {
    require_amendment(&state.pool, &req_id.0, id).await?;

    let rows = afs_db::list_feedback_for_amendment(&state.pool, id, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(afs_db::FeedbackRow::into_stored)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::ok(req_id.0, data)))
}
