use axum::{
    extract::{Query, State},
    Extension, Json,
};
use fiscaliza_pipeline::{
    load_expenses_by_category, load_expenses_by_party, load_top_spenders, CategoryTotal,
    PartyTotal, TopSpender,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, PeriodQuery};

const DEFAULT_TOP_SPENDERS: i64 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct TopSpendersQuery {
    pub limit: Option<i64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

pub(super) async fn list_by_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryTotal>>>, ApiError> {
    let period = query.to_filter(&req_id.0)?;
    let data = load_expenses_by_category(state.gateway(), period)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(data, req_id.0))
}

pub(super) async fn list_by_party(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<Vec<PartyTotal>>>, ApiError> {
    let period = query.to_filter(&req_id.0)?;
    let data = load_expenses_by_party(state.gateway(), period)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(data, req_id.0))
}

pub(super) async fn list_top_spenders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopSpendersQuery>,
) -> Result<Json<ApiResponse<Vec<TopSpender>>>, ApiError> {
    let period = PeriodQuery {
        month: query.month,
        year: query.year,
    }
    .to_filter(&req_id.0)?;
    let limit = usize::try_from(query.limit.unwrap_or(DEFAULT_TOP_SPENDERS).clamp(1, 100))
        .unwrap_or(10);

    let data = load_top_spenders(state.gateway(), period, limit)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(data, req_id.0))
}
