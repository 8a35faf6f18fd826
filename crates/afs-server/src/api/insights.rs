use std::str::FromStr;

use afs_core::SentimentLabel;
use afs_moderation::{word_cloud, SentimentBreakdown, TermCount, DEFAULT_MAX_TERMS};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, require_amendment, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct InsightsData {
    amendment_id: i64,
    sentiment: SentimentBreakdown,
    word_cloud: Vec<TermCount>,
}

/// GET /api/v1/amendments/{id}/insights: sentiment breakdown and word cloud.
pub(super) async fn get_insights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<InsightsData>>, ApiError> {
    require_amendment(&state.pool, &req_id.0, id).await?;

    let counts = afs_db::sentiment_counts(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let texts = afs_db::list_feedback_texts(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let pairs = counts.into_iter().filter_map(|row| {
        match SentimentLabel::from_str(&row.sentiment) {
            Ok(label) => Some((label, u64::try_from(row.count).unwrap_or(0))),
            Err(e) => {
                tracing::warn!(amendment_id = id, error = %e, "skipping unknown sentiment label");
                None
            }
        }
    });

    let data = InsightsData {
        amendment_id: id,
        sentiment: SentimentBreakdown::from_counts(pairs),
        word_cloud: word_cloud(texts.iter().map(String::as_str), DEFAULT_MAX_TERMS),
    };
    Ok(Json(ApiResponse::ok(req_id.0, data)))
}
