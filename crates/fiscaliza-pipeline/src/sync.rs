//! The sync orchestrator: one bounded, best-effort refresh of the store.
//!
//! 1. Fetch deputies and senators concurrently; both must succeed.
//! 2. Upsert the merged set. Failure here aborts the sync.
//! 3. Fetch the current year's expenses for the first `expense_sample`
//!    deputies, fail-soft, then replace the year's rows.
//! 4. Fetch recent votes for the first `vote_sample` deputies, fail-soft,
//!    then replace the votes dated within the trailing 30 days. Older rows
//!    are never touched, even when the source returns older votes.
//! 5. Fetch and upsert recent propositions; failure is logged only.

use std::future::Future;

use chrono::{Datelike, Duration, NaiveDate};
use fiscaliza_core::{AppConfig, Politician};
use fiscaliza_sources::normalize::dedupe_by_id;
use fiscaliza_sources::SourceError;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{FetchFailure, FetchStage, PipelineError};
use crate::gateway::Gateway;
use crate::source::LegislatureSource;

pub const DEFAULT_EXPENSE_SAMPLE: usize = 50;
pub const DEFAULT_VOTE_SAMPLE: usize = 30;
pub const DEFAULT_MAX_CONCURRENT: usize = 8;
pub const DEFAULT_PROPOSITION_LIMIT: usize = 50;
pub const VOTE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub expense_sample: usize,
    pub vote_sample: usize,
    pub max_concurrent: usize,
    pub proposition_limit: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            expense_sample: DEFAULT_EXPENSE_SAMPLE,
            vote_sample: DEFAULT_VOTE_SAMPLE,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            proposition_limit: DEFAULT_PROPOSITION_LIMIT,
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            expense_sample: config.sync_expense_sample,
            vote_sample: config.sync_vote_sample,
            max_concurrent: config.sync_max_concurrent,
            ..Self::default()
        }
    }
}

/// Rows processed per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub politicians: u64,
    pub expenses: u64,
    pub votes: u64,
    pub propositions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub stats: SyncStats,
    pub failures: Vec<FetchFailure>,
}

/// Runs one sync pass against `source`, writing through `gateway`.
///
/// `today` fixes the current year, the vote window and the default dates of
/// records the sources leave undated.
///
/// # Errors
///
/// Returns [`PipelineError::SourceUnavailable`] if either member list cannot
/// be fetched, or [`PipelineError::Persistence`] if the politician upsert
/// fails. Every later failure is logged and reflected in the counts only.
pub async fn run_sync<S, G>(
    source: &S,
    gateway: &G,
    options: &SyncOptions,
    today: NaiveDate,
) -> Result<SyncReport, PipelineError>
where
    S: LegislatureSource + ?Sized,
    G: Gateway + ?Sized,
{
    let (deputies, senators) = tokio::join!(source.fetch_deputies(), source.fetch_senators());
    let deputies =
        deputies.inspect_err(|e| tracing::error!(error = %e, "deputy list fetch failed"))?;
    let senators =
        senators.inspect_err(|e| tracing::error!(error = %e, "senator list fetch failed"))?;
    tracing::info!(
        deputies = deputies.len(),
        senators = senators.len(),
        "fetched member lists"
    );

    let politicians = dedupe_by_id(deputies.iter().chain(senators.iter()).cloned().collect());
    gateway
        .upsert_politicians(&politicians)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "politician upsert failed"))?;

    let mut report = SyncReport {
        stats: SyncStats {
            politicians: politicians.len() as u64,
            ..SyncStats::default()
        },
        failures: Vec::new(),
    };

    report.stats.expenses = sync_expenses(
        source,
        gateway,
        options,
        &deputies,
        today,
        &mut report.failures,
    )
    .await;
    report.stats.votes =
        sync_votes(source, gateway, options, &deputies, today, &mut report.failures).await;
    report.stats.propositions = sync_propositions(source, gateway, options, today).await;

    if !report.failures.is_empty() {
        tracing::warn!(
            failed = report.failures.len(),
            "some per-politician fetches failed during sync"
        );
    }
    tracing::info!(
        politicians = report.stats.politicians,
        expenses = report.stats.expenses,
        votes = report.stats.votes,
        propositions = report.stats.propositions,
        "sync complete"
    );
    Ok(report)
}

async fn sync_expenses<S, G>(
    source: &S,
    gateway: &G,
    options: &SyncOptions,
    deputies: &[Politician],
    today: NaiveDate,
    failures: &mut Vec<FetchFailure>,
) -> u64
where
    S: LegislatureSource + ?Sized,
    G: Gateway + ?Sized,
{
    let year = today.year();
    let sample = &deputies[..options.expense_sample.min(deputies.len())];
    let expenses = fan_out(
        sample,
        options.max_concurrent,
        FetchStage::Expenses,
        failures,
        move |id| source.fetch_expenses(id, year),
    )
    .await;

    if expenses.is_empty() {
        tracing::info!(year, "no expenses collected, keeping stored rows");
        return 0;
    }
    match gateway.replace_expenses_for_year(year, &expenses).await {
        Ok(_) => expenses.len() as u64,
        Err(e) => {
            tracing::error!(year, error = %e, "failed to replace expenses");
            0
        }
    }
}

async fn sync_votes<S, G>(
    source: &S,
    gateway: &G,
    options: &SyncOptions,
    deputies: &[Politician],
    today: NaiveDate,
    failures: &mut Vec<FetchFailure>,
) -> u64
where
    S: LegislatureSource + ?Sized,
    G: Gateway + ?Sized,
{
    let sample = &deputies[..options.vote_sample.min(deputies.len())];
    let votes = fan_out(
        sample,
        options.max_concurrent,
        FetchStage::Votes,
        failures,
        move |id| source.fetch_votes(id, today),
    )
    .await;

    if votes.is_empty() {
        tracing::info!("no votes collected, keeping stored rows");
        return 0;
    }
    let since = today - Duration::days(VOTE_WINDOW_DAYS);

    match gateway.replace_votes_since(since, &votes).await {
        Ok(_) => votes.len() as u64,
        Err(e) => {
            tracing::error!(%since, error = %e, "failed to replace votes");
            0
        }
    }
}

async fn sync_propositions<S, G>(
    source: &S,
    gateway: &G,
    options: &SyncOptions,
    today: NaiveDate,
) -> u64
where
    S: LegislatureSource + ?Sized,
    G: Gateway + ?Sized,
{
    let propositions = match source
        .fetch_recent_propositions(options.proposition_limit, today)
        .await
    {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "proposition fetch failed, skipping");
            return 0;
        }
    };
    match gateway.upsert_propositions(&propositions).await {
        Ok(_) => propositions.len() as u64,
        Err(e) => {
            tracing::warn!(error = %e, "proposition upsert failed, skipping");
            0
        }
    }
}

/// Runs `fetch` for every politician with at most `max_concurrent` in
/// flight. Successes are concatenated; each failure is logged and recorded
/// without cancelling its siblings.
async fn fan_out<T, F, Fut>(
    politicians: &[Politician],
    max_concurrent: usize,
    stage: FetchStage,
    failures: &mut Vec<FetchFailure>,
    fetch: F,
) -> Vec<T>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SourceError>>,
{
    let ids: Vec<i64> = politicians.iter().map(|p| p.id).collect();
    let results: Vec<(i64, Result<Vec<T>, SourceError>)> = stream::iter(ids)
        .map(|id| {
            let fut = fetch(id);
            async move { (id, fut.await) }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut collected = Vec::new();
    for (politician_id, result) in results {
        match result {
            Ok(items) => collected.extend(items),
            Err(e) => {
                tracing::warn!(
                    politician_id,
                    %stage,
                    error = %e,
                    "fetch failed, skipping politician"
                );
                failures.push(FetchFailure {
                    politician_id,
                    stage,
                    message: e.to_string(),
                });
            }
        }
    }
    collected
}
