//! A sync pass logged in `sync_runs`.

use chrono::NaiveDate;
use fiscaliza_db::SyncRunCounts;

use crate::error::PipelineError;
use crate::gateway::Gateway;
use crate::source::LegislatureSource;
use crate::sync::{run_sync, SyncOptions, SyncReport};

/// Creates a `sync_runs` row, runs [`run_sync`] through `gateway`, and marks
/// the row succeeded with the final counts or failed with the error.
///
/// # Errors
///
/// Returns [`PipelineError`] if the run cannot be recorded or the sync
/// itself fails.
pub async fn run_recorded_sync<S, G>(
    gateway: &G,
    source: &S,
    options: &SyncOptions,
    today: NaiveDate,
    trigger_source: &str,
) -> Result<SyncReport, PipelineError>
where
    S: LegislatureSource + ?Sized,
    G: Gateway + ?Sized,
{
    let run_id = gateway.create_sync_run(trigger_source).await?;
    if let Err(e) = gateway.start_sync_run(run_id).await {
        fail_run_best_effort(gateway, run_id, &e.to_string()).await;
        return Err(e.into());
    }
    tracing::info!(run_id, trigger_source, "sync run started");

    let report = match run_sync(source, gateway, options, today).await {
        Ok(report) => report,
        Err(e) => {
            fail_run_best_effort(gateway, run_id, &e.to_string()).await;
            return Err(e);
        }
    };

    if let Err(e) = gateway.complete_sync_run(run_id, counts(&report)).await {
        fail_run_best_effort(gateway, run_id, &e.to_string()).await;
        return Err(e.into());
    }
    Ok(report)
}

fn counts(report: &SyncReport) -> SyncRunCounts {
    let clamp = |n: u64| i32::try_from(n).unwrap_or(i32::MAX);
    SyncRunCounts {
        politicians: clamp(report.stats.politicians),
        expenses: clamp(report.stats.expenses),
        votes: clamp(report.stats.votes),
        propositions: clamp(report.stats.propositions),
        failed_fetches: clamp(report.failures.len() as u64),
    }
}

async fn fail_run_best_effort<G: Gateway + ?Sized>(gateway: &G, run_id: i64, message: &str) {
    if let Err(mark_err) = gateway.fail_sync_run(run_id, message).await {
        tracing::error!(run_id, error = %mark_err, "failed to mark sync run as failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchFailure, FetchStage};
    use crate::sync::SyncStats;

    #[test]
    fn counts_copy_stats_and_failures() {
        let report = SyncReport {
            stats: SyncStats {
                politicians: 594,
                expenses: 1_200,
                votes: 580,
                propositions: 50,
            },
            failures: vec![FetchFailure {
                politician_id: 1,
                stage: FetchStage::Votes,
                message: "timeout".to_string(),
            }],
        };
        let c = counts(&report);
        assert_eq!(c.politicians, 594);
        assert_eq!(c.propositions, 50);
        assert_eq!(c.failed_fetches, 1);
    }
}
