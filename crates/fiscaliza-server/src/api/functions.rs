//! The three callable operations.
//!
//! These keep the flat payloads their callers expect: a bare result object
//! on success and `{ "error": "..." }` on failure, without the `data`/`meta`
//! envelope used by the read views.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use fiscaliza_pipeline::{calculate_score, PipelineError, ScoreOutcome, SyncStats};
use fiscaliza_simplify::{SimplifyError, SimplifyResponse};
use serde::{Deserialize, Serialize};

use crate::sync::{run_exclusive_sync, SyncAttempt};

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct FunctionError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl FunctionError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<JsonRejection> for FunctionError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PipelineError> for FunctionError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::NotFound { politician_id } => Self::new(
                StatusCode::NOT_FOUND,
                format!("Político {politician_id} não encontrado"),
            ),
            PipelineError::SourceUnavailable(e) => {
                tracing::error!(error = %e, "legislature source failed");
                Self::new(StatusCode::BAD_GATEWAY, e.to_string())
            }
            PipelineError::Persistence(e) => {
                tracing::error!(error = %e, "persistence failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<SimplifyError> for FunctionError {
    fn from(error: SimplifyError) -> Self {
        let status = match &error {
            SimplifyError::MissingInput => StatusCode::BAD_REQUEST,
            SimplifyError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            SimplifyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SimplifyError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            SimplifyError::Upstream { .. }
            | SimplifyError::Transport(_)
            | SimplifyError::EmptyResponse => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::error!(error = %error, "legislation simplification failed");
        }
        Self::new(status, error.to_string())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SyncResult {
    success: bool,
    message: &'static str,
    stats: SyncStats,
}

pub(super) async fn sync_political_data(
    State(state): State<AppState>,
) -> Result<Json<SyncResult>, FunctionError> {
    match run_exclusive_sync(&state, "api").await? {
        SyncAttempt::Completed(report) => Ok(Json(SyncResult {
            success: true,
            message: "Sincronização concluída",
            stats: report.stats,
        })),
        SyncAttempt::AlreadyRunning => Err(FunctionError::new(
            StatusCode::CONFLICT,
            "Sincronização já em andamento",
        )),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ScoreRequest {
    politician_id: Option<i64>,
}

pub(super) async fn calculate_ranking_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreOutcome>, FunctionError> {
    let Json(request) = payload?;
    let politician_id = request.politician_id.ok_or_else(|| {
        FunctionError::new(StatusCode::BAD_REQUEST, "Campo politician_id é obrigatório")
    })?;

    let outcome = calculate_score(state.gateway(), politician_id, Utc::now()).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub(super) struct SimplifyRequest {
    text_to_simplify: Option<String>,
}

pub(super) async fn simplify_legislation(
    State(state): State<AppState>,
    payload: Result<Json<SimplifyRequest>, JsonRejection>,
) -> Result<Json<SimplifyResponse>, FunctionError> {
    let Json(request) = payload?;
    let text = request.text_to_simplify.ok_or(SimplifyError::MissingInput)?;
    let response = state.simplifier.simplify(&text).await?;
    Ok(Json(response))
}
