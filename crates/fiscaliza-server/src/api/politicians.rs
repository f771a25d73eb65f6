use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use fiscaliza_core::{Politician, Role};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// Rows of each kind shown on a profile.
const PROFILE_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub(super) struct PoliticiansQuery {
    pub role: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PoliticianItem {
    id: i64,
    name: String,
    party: String,
    state: String,
    role: Role,
    photo: Option<String>,
    email: Option<String>,
    initials: String,
}

impl From<Politician> for PoliticianItem {
    fn from(p: Politician) -> Self {
        Self {
            initials: p.initials(),
            id: p.id,
            name: p.name,
            party: p.party,
            state: p.state,
            role: p.role,
            photo: p.photo,
            email: p.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ExpenseItem {
    id: i64,
    year: i32,
    month: i32,
    category: String,
    description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    value: Decimal,
    date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(super) struct VoteItem {
    id: i64,
    proposition_id: String,
    proposition_title: String,
    vote: String,
    date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileStats {
    #[serde(with = "rust_decimal::serde::float")]
    total_expenses: Decimal,
    total_votes: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct PoliticianProfile {
    #[serde(flatten)]
    politician: PoliticianItem,
    expenses: Vec<ExpenseItem>,
    votes: Vec<VoteItem>,
    stats: ProfileStats,
}

pub(super) async fn list_politicians(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PoliticiansQuery>,
) -> Result<Json<ApiResponse<Vec<PoliticianItem>>>, ApiError> {
    let role = query
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;
    let uf = query.state.as_deref().map(str::to_uppercase);

    let politicians = fiscaliza_db::list_politicians(&state.pool, role, uf.as_deref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = politicians.into_iter().map(PoliticianItem::from).collect();
    Ok(ApiResponse::new(data, req_id.0))
}

pub(super) async fn get_politician_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PoliticianProfile>>, ApiError> {
    let db_err = |e: fiscaliza_db::DbError| map_db_error(req_id.0.clone(), &e);

    let politician = fiscaliza_db::get_politician(&state.pool, id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("politician {id} not found"),
            )
        })?;

    let expenses =
        fiscaliza_db::latest_expenses_for_politician(&state.pool, id, PROFILE_HISTORY_LIMIT)
            .await
            .map_err(db_err)?;
    let votes = fiscaliza_db::latest_votes_for_politician(&state.pool, id, PROFILE_HISTORY_LIMIT)
        .await
        .map_err(db_err)?;
    let total_expenses = fiscaliza_db::total_expenses_for_politician(&state.pool, id)
        .await
        .map_err(db_err)?;
    let total_votes = fiscaliza_db::count_votes_for_politician(&state.pool, id)
        .await
        .map_err(db_err)?;

    let profile = PoliticianProfile {
        politician: politician.into(),
        expenses: expenses
            .into_iter()
            .map(|row| ExpenseItem {
                id: row.id,
                year: row.year,
                month: row.month,
                category: row.category,
                description: row.description,
                value: row.value,
                date: row.date,
            })
            .collect(),
        votes: votes
            .into_iter()
            .map(|row| VoteItem {
                id: row.id,
                proposition_id: row.proposition_id,
                proposition_title: row.proposition_title,
                vote: row.vote,
                date: row.date,
            })
            .collect(),
        stats: ProfileStats {
            total_expenses,
            total_votes,
        },
    };

    Ok(ApiResponse::new(profile, req_id.0))
}
