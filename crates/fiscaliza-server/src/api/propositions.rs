use axum::{
    extract::{Query, State},
    Extension, Json,
};
use fiscaliza_core::Proposition;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PropositionsQuery {
    pub limit: Option<i64>,
}

pub(super) async fn list_propositions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PropositionsQuery>,
) -> Result<Json<ApiResponse<Vec<Proposition>>>, ApiError> {
    let rows = fiscaliza_db::list_recent_propositions(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(Proposition::from).collect();
    Ok(ApiResponse::new(data, req_id.0))
}
