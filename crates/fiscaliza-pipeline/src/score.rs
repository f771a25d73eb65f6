//! Per-politician reputation score with a 24-hour cache.
//!
//! ```text
//! V  = favorable / total × 10        (5 when there are no votes)
//! G  = clamp(10 − (Σ expenses / 12) / 50 000 × 10, 0, 10)
//! P  = 0, OT = 0
//! total = ((V × 3) + G) / 4 + P + OT
//! ```
//!
//! Votes and expenses are those dated within the last 12 months. The total
//! is computed from the unrounded components, then every stored figure is
//! rounded to two places.

use chrono::{DateTime, Months, SubsecRound, Utc};
use fiscaliza_core::{RawExpense, RawVote, Score};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::PipelineError;
use crate::gateway::Gateway;

/// The only vote label counted as favorable.
pub const FAVORABLE_VOTE: &str = "Sim";
/// Monthly spending at which the expense component reaches zero.
pub const MONTHLY_EXPENSE_CEILING: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);
const LOOKBACK_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Cache,
    Calculated,
}

/// A score together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    #[serde(flatten)]
    pub score: Score,
    pub source: ScoreSource,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Share of `"Sim"` votes scaled to 0–10, or 5 with no votes.
#[must_use]
pub fn vote_component(votes: &[RawVote]) -> Decimal {
    if votes.is_empty() {
        return Decimal::from(5);
    }
    let favorable = votes.iter().filter(|v| v.vote == FAVORABLE_VOTE).count();
    Decimal::from(favorable) / Decimal::from(votes.len()) * Decimal::TEN
}

/// Spending efficiency scaled to 0–10; lower average monthly spend scores higher.
#[must_use]
pub fn expense_component(expenses: &[RawExpense]) -> Decimal {
    let total: Decimal = expenses.iter().map(|e| e.value).sum();
    let monthly = total / Decimal::from(12);
    let raw = Decimal::TEN - monthly / MONTHLY_EXPENSE_CEILING * Decimal::TEN;
    raw.clamp(Decimal::ZERO, Decimal::TEN)
}

/// Computes a fresh score from already-windowed votes and expenses.
#[must_use]
pub fn compute_score(
    politician_id: i64,
    votes: &[RawVote],
    expenses: &[RawExpense],
    calculated_at: DateTime<Utc>,
) -> Score {
    let v = vote_component(votes);
    let g = expense_component(expenses);
    let litigation = Decimal::ZERO;
    let other = Decimal::ZERO;
    let total = (v * Decimal::from(3) + g) / Decimal::from(4) + litigation + other;

    Score {
        politician_id,
        total: round2(total),
        votes: round2(v),
        expenses: round2(g),
        litigation,
        other,
        calculated_at,
    }
}

/// Returns the cached score when fresh, otherwise recomputes and stores it.
///
/// # Errors
///
/// Returns [`PipelineError::NotFound`] when recomputation is needed and the
/// politician does not exist (no row is written), or
/// [`PipelineError::Persistence`] on any gateway failure.
pub async fn calculate_score<G>(
    gateway: &G,
    politician_id: i64,
    now: DateTime<Utc>,
) -> Result<ScoreOutcome, PipelineError>
where
    G: Gateway + ?Sized,
{
    if let Some(cached) = gateway.get_score(politician_id).await? {
        if cached.is_fresh(now) {
            tracing::debug!(politician_id, "returning cached score");
            return Ok(ScoreOutcome {
                score: cached,
                source: ScoreSource::Cache,
            });
        }
    }

    if gateway.get_politician(politician_id).await?.is_none() {
        return Err(PipelineError::NotFound { politician_id });
    }

    let today = now.date_naive();
    let since = today
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(today);
    let votes = gateway.votes_since(politician_id, since).await?;
    let expenses = gateway.expenses_since(politician_id, since).await?;

    // Postgres keeps microseconds; truncating here makes the stored and
    // returned timestamps identical.
    let score = compute_score(politician_id, &votes, &expenses, now.trunc_subsecs(6));
    gateway.upsert_score(&score).await?;
    tracing::info!(politician_id, total = %score.total, "score calculated");

    Ok(ScoreOutcome {
        score,
        source: ScoreSource::Calculated,
    })
}
