//! Read-side views grouped in memory from persisted rows.
//!
//! The pure functions take already-filtered rows and do the grouping; the
//! `load_*` wrappers fetch through a [`Gateway`] for a [`PeriodFilter`].

use std::collections::{BTreeMap, HashMap, HashSet};

use fiscaliza_core::{initials, PeriodFilter, Politician, RawExpense, RawVote, Region, Role};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::PipelineError;
use crate::gateway::Gateway;

pub const RANKING_SIZE: usize = 10;
const RANKING_BASE: i64 = 60;
const RANKING_VOTE_POINTS: i64 = 2;
const RANKING_VOTE_CAP: i64 = 40;
const RANKING_SPEND_STEP: i64 = 5_000;
const RANKING_SPEND_CAP: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSpender {
    pub politician_id: i64,
    pub politician_name: String,
    pub party: String,
    pub state: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub photo: Option<String>,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyTotal {
    pub party: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub politician_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub politician_id: i64,
    pub name: String,
    pub party: String,
    pub state: String,
    pub role: Role,
    pub photo: Option<String>,
    pub initials: String,
    pub score: i64,
    pub votes: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
}

/// Which politicians a ranking covers, and over which period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingFilter {
    pub state: Option<String>,
    pub region: Option<Region>,
    pub period: PeriodFilter,
}

impl RankingFilter {
    fn admits(&self, politician: &Politician) -> bool {
        self.state
            .as_deref()
            .is_none_or(|s| politician.state.eq_ignore_ascii_case(s))
            && self.region.is_none_or(|r| r.contains(&politician.state))
    }
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Groups expenses by category, largest total first.
#[must_use]
pub fn expenses_by_category(expenses: &[RawExpense]) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for e in expenses {
        let entry = groups.entry(e.category.as_str()).or_default();
        entry.0 += e.value;
        entry.1 += 1;
    }
    let grand_total: Decimal = groups.values().map(|(total, _)| *total).sum();

    let mut out: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
            percentage: percentage_of(total, grand_total),
        })
        .collect();
    // BTreeMap order makes equal totals fall back to category name.
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

/// The `limit` politicians with the largest summed expenses.
///
/// Sums without a matching politician are dropped.
#[must_use]
pub fn top_spenders(
    expenses: &[RawExpense],
    politicians: &[Politician],
    limit: usize,
) -> Vec<TopSpender> {
    let mut totals: HashMap<i64, Decimal> = HashMap::new();
    for e in expenses {
        *totals.entry(e.politician_id).or_default() += e.value;
    }

    let mut ranked: Vec<(i64, Decimal)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let by_id: HashMap<i64, &Politician> = politicians.iter().map(|p| (p.id, p)).collect();
    ranked
        .into_iter()
        .take(limit)
        .filter_map(|(id, total)| {
            let p = by_id.get(&id)?;
            Some(TopSpender {
                politician_id: id,
                politician_name: p.name.clone(),
                party: p.party.clone(),
                state: p.state.clone(),
                total,
                photo: p.photo.clone(),
                initials: initials(&p.name),
            })
        })
        .collect()
}

/// Groups expenses by the spending politician's party, largest first.
///
/// Expenses whose politician is unknown or has no party are left out of
/// both the groups and the grand total.
#[must_use]
pub fn expenses_by_party(expenses: &[RawExpense], politicians: &[Politician]) -> Vec<PartyTotal> {
    let party_of: HashMap<i64, &str> = politicians
        .iter()
        .filter(|p| !p.party.is_empty())
        .map(|p| (p.id, p.party.as_str()))
        .collect();

    let mut groups: BTreeMap<&str, (Decimal, HashSet<i64>)> = BTreeMap::new();
    for e in expenses {
        let Some(party) = party_of.get(&e.politician_id) else {
            continue;
        };
        let entry = groups.entry(*party).or_default();
        entry.0 += e.value;
        entry.1.insert(e.politician_id);
    }
    let grand_total: Decimal = groups.values().map(|(total, _)| *total).sum();

    let mut out: Vec<PartyTotal> = groups
        .into_iter()
        .map(|(party, (total, members))| PartyTotal {
            party: party.to_string(),
            total,
            politician_count: members.len(),
            percentage: percentage_of(total, grand_total),
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

/// `60 + min(2 × votes, 40) − min(⌊expenses / 5000⌋, 20)`.
#[must_use]
pub fn ranking_score(votes: u64, expenses: Decimal) -> i64 {
    let vote_points = i64::try_from(votes)
        .unwrap_or(i64::MAX)
        .saturating_mul(RANKING_VOTE_POINTS)
        .min(RANKING_VOTE_CAP);
    let penalty = (expenses / Decimal::from(RANKING_SPEND_STEP))
        .floor()
        .to_i64()
        .unwrap_or(i64::MAX)
        .clamp(0, RANKING_SPEND_CAP);
    RANKING_BASE + vote_points - penalty
}

/// Top ten politicians admitted by `filter`, ranked 1..N without gaps.
///
/// `votes` and `expenses` must already be restricted to the filter's
/// period. Equal scores are ordered by name, then id.
#[must_use]
pub fn ranking(
    politicians: &[Politician],
    votes: &[RawVote],
    expenses: &[RawExpense],
    filter: &RankingFilter,
) -> Vec<RankingEntry> {
    let mut vote_counts: HashMap<i64, u64> = HashMap::new();
    for v in votes {
        *vote_counts.entry(v.politician_id).or_default() += 1;
    }
    let mut spend: HashMap<i64, Decimal> = HashMap::new();
    for e in expenses {
        *spend.entry(e.politician_id).or_default() += e.value;
    }

    let mut scored: Vec<(i64, u64, Decimal, &Politician)> = politicians
        .iter()
        .filter(|p| filter.admits(p))
        .map(|p| {
            let votes = vote_counts.get(&p.id).copied().unwrap_or(0);
            let expenses = spend.get(&p.id).copied().unwrap_or(Decimal::ZERO);
            (ranking_score(votes, expenses), votes, expenses, p)
        })
        .collect();
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.3.name.cmp(&b.3.name))
            .then(a.3.id.cmp(&b.3.id))
    });

    scored
        .into_iter()
        .take(RANKING_SIZE)
        .enumerate()
        .map(|(i, (score, votes, expenses, p))| RankingEntry {
            rank: i + 1,
            politician_id: p.id,
            name: p.name.clone(),
            party: p.party.clone(),
            state: p.state.clone(),
            role: p.role,
            photo: p.photo.clone(),
            initials: initials(&p.name),
            score,
            votes,
            expenses,
        })
        .collect()
}

/// # Errors
///
/// Returns [`PipelineError::Persistence`] if the expense query fails.
pub async fn load_expenses_by_category<G: Gateway + ?Sized>(
    gateway: &G,
    period: PeriodFilter,
) -> Result<Vec<CategoryTotal>, PipelineError> {
    let expenses = gateway.list_expenses(period).await?;
    Ok(expenses_by_category(&expenses))
}

/// # Errors
///
/// Returns [`PipelineError::Persistence`] if either query fails.
pub async fn load_top_spenders<G: Gateway + ?Sized>(
    gateway: &G,
    period: PeriodFilter,
    limit: usize,
) -> Result<Vec<TopSpender>, PipelineError> {
    let expenses = gateway.list_expenses(period).await?;
    if expenses.is_empty() {
        return Ok(Vec::new());
    }
    let politicians = gateway.list_politicians().await?;
    Ok(top_spenders(&expenses, &politicians, limit))
}

/// # Errors
///
/// Returns [`PipelineError::Persistence`] if either query fails.
pub async fn load_expenses_by_party<G: Gateway + ?Sized>(
    gateway: &G,
    period: PeriodFilter,
) -> Result<Vec<PartyTotal>, PipelineError> {
    let expenses = gateway.list_expenses(period).await?;
    let politicians = gateway.list_politicians().await?;
    Ok(expenses_by_party(&expenses, &politicians))
}

/// # Errors
///
/// Returns [`PipelineError::Persistence`] if any query fails.
pub async fn load_ranking<G: Gateway + ?Sized>(
    gateway: &G,
    filter: &RankingFilter,
) -> Result<Vec<RankingEntry>, PipelineError> {
    let politicians = gateway.list_politicians().await?;
    let votes = gateway.list_votes(filter.period).await?;
    let expenses = gateway.list_expenses(filter.period).await?;
    Ok(ranking(&politicians, &votes, &expenses, filter))
}
