use fiscaliza_db::DbError;
use fiscaliza_sources::SourceError;
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a pipeline operation.
///
/// Per-politician fetch failures inside a sync are not errors at this
/// level; they are collected as [`FetchFailure`] values in the report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("legislature source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("politician {politician_id} not found")]
    NotFound { politician_id: i64 },

    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),
}

/// Which per-politician fetch a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStage {
    Expenses,
    Votes,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStage::Expenses => f.pad("expenses"),
            FetchStage::Votes => f.pad("votes"),
        }
    }
}

/// One politician whose expense or vote fetch failed during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub politician_id: i64,
    pub stage: FetchStage,
    pub message: String,
}
