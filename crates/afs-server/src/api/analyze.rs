use afs_moderation::{analyze_comments, read_comments, BatchAnalysis, BatchError};
use axum::{body::Bytes, extract::State, Extension, Json};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// POST /api/v1/analyze: sentiment and summary for every row of a CSV body
/// with a `comment` or `feedback` column. Nothing is stored.
pub(super) async fn analyze_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<BatchAnalysis>>, ApiError> {
    let rid = req_id.0;

    let comments = read_comments(body.as_ref()).map_err(|e| match e {
        BatchError::MissingTextColumn => ApiError::new(&rid, "validation_error", e.to_string()),
        BatchError::Csv(_) => ApiError::new(&rid, "bad_request", e.to_string()),
    })?;

    let analysis = analyze_comments(
        state.pipeline.classifiers(),
        comments,
        state.pipeline.config().call_timeout,
    )
    .await
    .map_err(|e| {
        tracing::error!(request_id = %rid, error = %e, "comment batch analysis failed");
        ApiError::new(&rid, "internal_error", "failed to analyze comments")
    })?;

    let message = format!("Analyzed {} comments successfully", analysis.total_comments);
    Ok(Json(ApiResponse::ok(rid, analysis).with_message(message)))
}
