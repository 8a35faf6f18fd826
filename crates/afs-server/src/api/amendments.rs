//! Amendment handlers: create, list, detail.

use afs_core::{CoreError, NewAmendment};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{
    map_db_error, map_json_rejection, require_amendment, ApiError, ApiResponse, AppState,
};

#[derive(Debug, Serialize)]
pub(super) struct AmendmentItem {
    id: i64,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<afs_db::AmendmentRow> for AmendmentItem {
    fn from(row: afs_db::AmendmentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// POST /api/v1/amendments: create an amendment open for feedback.
pub(super) async fn create_amendment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<NewAmendment>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AmendmentItem>>), ApiError> {
    let Json(body) = payload.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let amendment = body.validated().map_err(|e| match e {
        CoreError::Validation(msg) => ApiError::new(&req_id.0, "validation_error", msg),
        other => ApiError::new(&req_id.0, "validation_error", other.to_string()),
    })?;

    let row = afs_db::insert_amendment(&state.pool, &amendment)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    tracing::info!(amendment_id = row.id, "amendment created");

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(req_id.0, AmendmentItem::from(row))
                .with_message("Amendment created successfully"),
        ),
    ))
}

/// GET /api/v1/amendments: newest first.
pub(super) async fn list_amendments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<AmendmentItem>>>, ApiError> {
    let rows = afs_db::list_amendments(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(AmendmentItem::from).collect();
    Ok(Json(ApiResponse::ok(req_id.0, data)))
}

/// GET /api/v1/amendments/{id}
pub(super) async fn get_amendment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AmendmentItem>>, ApiError> {
    let row = require_amendment(&state.pool, &req_id.0, id).await?;
    Ok(Json(ApiResponse::ok(req_id.0, AmendmentItem::from(row))))
}
