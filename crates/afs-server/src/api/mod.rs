mod amendments;
mod analyze;
mod feedback;
mod insights;

use std::sync::Arc;

use afs_moderation::ModerationPipeline;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub pipeline: Arc<ModerationPipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    classifiers: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn ok(request_id: String, data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            meta: ResponseMeta::new(request_id),
        }
    }

    pub(super) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            data: None,
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "content_rejected" => StatusCode::UNPROCESSABLE_ENTITY,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &afs_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// Malformed or mistyped JSON bodies are the caller's fault, not ours.
pub(super) fn map_json_rejection(request_id: String, rejection: &JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    ApiError::new(request_id, "bad_request", rejection.body_text())
}

/// Look up an amendment or fail with `not_found`.
pub(super) async fn require_amendment(
    pool: &PgPool,
    request_id: &str,
    amendment_id: i64,
) -> Result<afs_db::AmendmentRow, ApiError> {
    afs_db::get_amendment(pool, amendment_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "not_found",
                format!("Amendment {amendment_id} not found"),
            )
        })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let limited = axum::middleware::from_fn_with_state(rate_limit, enforce_rate_limit);

    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/amendments",
            get(amendments::list_amendments)
                .merge(post(amendments::create_amendment).layer(limited.clone())),
        )
        .route("/api/v1/amendments/{id}", get(amendments::get_amendment))
        .route(
            "/api/v1/amendments/{id}/feedback",
            get(feedback::list_feedback),
        )
        .route(
            "/api/v1/amendments/{id}/insights",
            get(insights::get_insights),
        )
        .route(
            "/api/v1/feedback",
            post(feedback::submit_feedback).layer(limited.clone()),
        )
        .route(
            "/api/v1/analyze",
            post(analyze::analyze_csv).layer(limited),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let classifiers = state.pipeline.classifiers().backend();

    match afs_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                req_id.0,
                HealthData {
                    status: "ok",
                    database: "ok",
                    classifiers,
                },
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    message: None,
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                        classifiers,
                    },
                    meta: ResponseMeta::new(req_id.0),
                }),
            )
        }
    }
}
