//! Single-flight wrapper around a recorded sync pass.
//!
//! The HTTP trigger, the cron job and the start-up auto-sync all go through
//! [`run_exclusive_sync`]; a second caller arriving while a pass is running
//! is turned away instead of racing the windowed replaces.

use chrono::Utc;
use fiscaliza_pipeline::{run_recorded_sync, PipelineError, SyncReport};

use crate::api::AppState;

#[derive(Debug)]
pub enum SyncAttempt {
    Completed(SyncReport),
    AlreadyRunning,
}

/// # Errors
///
/// Returns [`PipelineError`] when the sync pass itself fails.
pub async fn run_exclusive_sync(
    state: &AppState,
    trigger_source: &str,
) -> Result<SyncAttempt, PipelineError> {
    let Ok(_guard) = state.sync_guard.try_lock() else {
        tracing::warn!(trigger_source, "sync already running; skipping");
        return Ok(SyncAttempt::AlreadyRunning);
    };

    let today = Utc::now().date_naive();
    let report = run_recorded_sync(
        state.gateway(),
        state.source.as_ref(),
        &state.sync_options,
        today,
        trigger_source,
    )
    .await?;

    tracing::info!(
        trigger_source,
        politicians = report.stats.politicians,
        expenses = report.stats.expenses,
        votes = report.stats.votes,
        propositions = report.stats.propositions,
        failed_fetches = report.failures.len(),
        "sync complete"
    );
    Ok(SyncAttempt::Completed(report))
}
