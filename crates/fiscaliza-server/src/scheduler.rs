//! Background job scheduler.
//!
//! Registers the recurring legislature sync on the configured cron
//! expression.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;
use crate::sync::{run_exclusive_sync, SyncAttempt};

/// Builds and starts the scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    state: AppState,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_sync_job(&scheduler, state, cron).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_sync_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting legislature sync");
            match run_exclusive_sync(&state, "scheduler").await {
                Ok(SyncAttempt::Completed(_)) => {
                    tracing::info!("scheduler: legislature sync complete");
                }
                Ok(SyncAttempt::AlreadyRunning) => {}
                Err(e) => tracing::error!(error = %e, "scheduler: legislature sync failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered legislature sync");
    Ok(())
}
