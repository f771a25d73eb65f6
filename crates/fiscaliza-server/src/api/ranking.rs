use axum::{
    extract::{Query, State},
    Extension, Json,
};
use fiscaliza_core::Region;
use fiscaliza_pipeline::{load_ranking, RankingEntry, RankingFilter};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, PeriodQuery};

#[derive(Debug, Deserialize)]
pub(super) struct RankingQuery {
    pub state: Option<String>,
    pub region: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

impl RankingQuery {
    fn to_filter(&self, request_id: &str) -> Result<RankingFilter, ApiError> {
        let region = self
            .region
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(str::parse::<Region>)
            .transpose()
            .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))?;
        let period = PeriodQuery {
            month: self.month,
            year: self.year,
        }
        .to_filter(request_id)?;

        Ok(RankingFilter {
            state: self.state.clone().filter(|s| !s.trim().is_empty()),
            region,
            period,
        })
    }
}

pub(super) async fn list_ranking(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<ApiResponse<Vec<RankingEntry>>>, ApiError> {
    let filter = query.to_filter(&req_id.0)?;
    let data = load_ranking(state.gateway(), &filter)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(data, req_id.0))
}

#[cfg(test)]
mod tests {
    use fiscaliza_core::PeriodFilter;

    use super::*;

    #[test]
    fn region_and_state_combine() {
        let query = RankingQuery {
            state: Some("sp".to_string()),
            region: Some("Sudeste".to_string()),
            month: Some(3),
            year: Some(2025),
        };
        let filter = query.to_filter("req-1").expect("valid");
        assert_eq!(filter.region, Some(Region::Sudeste));
        assert_eq!(filter.state.as_deref(), Some("sp"));
        assert_eq!(
            filter.period,
            PeriodFilter {
                month: Some(3),
                year: Some(2025)
            }
        );
    }

    #[test]
    fn blank_parameters_mean_no_filter() {
        let query = RankingQuery {
            state: Some(String::new()),
            region: Some(" ".to_string()),
            month: None,
            year: None,
        };
        let filter = query.to_filter("req-1").expect("valid");
        assert_eq!(filter, RankingFilter::default());
    }

    #[test]
    fn unknown_region_is_rejected() {
        let query = RankingQuery {
            state: None,
            region: Some("atlantida".to_string()),
            month: None,
            year: None,
        };
        assert!(query.to_filter("req-1").is_err());
    }
}
