mod expenses;
mod functions;
mod politicians;
mod propositions;
mod ranking;
mod sync_runs;

use std::sync::Arc;
use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use fiscaliza_core::PeriodFilter;
use fiscaliza_pipeline::{Gateway, LegislatureSource, PipelineError, SyncOptions};
use fiscaliza_simplify::Simplifier;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};

/// Shared handler state.
///
/// `pool` serves the list views that read rows directly; everything the
/// pipeline touches goes through `gateway`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub gateway: Arc<dyn Gateway>,
    pub source: Arc<dyn LegislatureSource>,
    pub simplifier: Arc<Simplifier>,
    pub sync_options: SyncOptions,
    pub sync_guard: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub(crate) fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
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
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
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
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Month/year query parameters shared by the expense and ranking views.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PeriodQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    pub(super) fn to_filter(&self, request_id: &str) -> Result<PeriodFilter, ApiError> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(ApiError::new(
                    request_id,
                    "validation_error",
                    format!("month must be between 1 and 12, got {month}"),
                ));
            }
        }
        Ok(PeriodFilter {
            month: self.month,
            year: self.year,
        })
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &fiscaliza_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::Persistence(e) => map_db_error(request_id, e),
        PipelineError::NotFound { politician_id } => ApiError::new(
            request_id,
            "not_found",
            format!("politician {politician_id} not found"),
        ),
        PipelineError::SourceUnavailable(e) => {
            tracing::error!(error = %e, "legislature source failed");
            ApiError::new(request_id, "internal_error", "legislature source unavailable")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/functions/sync-political-data",
            post(functions::sync_political_data),
        )
        .route(
            "/api/v1/functions/calculate-ranking-score",
            post(functions::calculate_ranking_score),
        )
        .route(
            "/api/v1/functions/simplify-legislation",
            post(functions::simplify_legislation),
        )
        .route("/api/v1/politicians", get(politicians::list_politicians))
        .route(
            "/api/v1/politicians/{id}",
            get(politicians::get_politician_profile),
        )
        .route(
            "/api/v1/expenses/by-category",
            get(expenses::list_by_category),
        )
        .route("/api/v1/expenses/by-party", get(expenses::list_by_party))
        .route(
            "/api/v1/expenses/top-spenders",
            get(expenses::list_top_spenders),
        )
        .route("/api/v1/ranking", get(ranking::list_ranking))
        .route("/api/v1/propositions", get(propositions::list_propositions))
        .route("/api/v1/sync-runs", get(sync_runs::list_sync_runs))
}

pub fn build_app(state: AppState) -> Router {
    api_router()
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match fiscaliza_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{get, json_body, offline_state};
    use super::*;
    use tower::ServiceExt;

    fn open_app() -> Router {
        build_app(offline_state())
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn period_query_rejects_month_out_of_range() {
        let query = PeriodQuery {
            month: Some(13),
            year: Some(2025),
        };
        assert!(query.to_filter("req-1").is_err());

        let ok = PeriodQuery {
            month: Some(12),
            year: None,
        };
        assert_eq!(
            ok.to_filter("req-1").expect("valid"),
            PeriodFilter {
                month: Some(12),
                year: None
            }
        );
    }

    #[test]
    fn not_found_pipeline_error_maps_to_404() {
        let err = map_pipeline_error("req-1".to_string(), &PipelineError::NotFound {
            politician_id: 9,
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_degraded_without_database() {
        let response = open_app()
            .oneshot(get("/api/v1/health"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key("x-request-id"));
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "degraded");
    }

    #[tokio::test]
    async fn incoming_request_id_is_echoed() {
        let request = axum::http::Request::builder()
            .uri("/api/v1/health")
            .header("x-request-id", "req-abc")
            .body(axum::body::Body::empty())
            .expect("request");
        let response = open_app().oneshot(request).await.expect("response");

        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn unknown_region_is_a_validation_error() {
        let response = open_app()
            .oneshot(get("/api/v1/ranking?region=atlantida"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn invalid_month_is_rejected_before_querying() {
        let response = open_app()
            .oneshot(get("/api/v1/expenses/by-category?month=0"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }
}
