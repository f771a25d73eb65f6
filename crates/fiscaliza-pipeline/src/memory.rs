//! In-memory [`Gateway`] for tests and dry runs.
//!
//! Holds every collection behind one mutex and mirrors the Postgres
//! semantics the pipeline relies on: upserts keyed by id, windowed
//! replaces, one score row per politician. Individual operations can be
//! made to fail to exercise error paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use fiscaliza_core::{PeriodFilter, Politician, Proposition, RawExpense, RawVote, Score};
use fiscaliza_db::{DbError, SyncRunCounts};

use crate::gateway::Gateway;

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    UpsertPoliticians,
    ReplaceExpenses,
    ReplaceVotes,
    UpsertPropositions,
    UpsertScore,
    CreateSyncRun,
}

/// A `sync_runs` row as the in-memory gateway keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub id: i64,
    pub trigger_source: String,
    pub status: &'static str,
    pub counts: SyncRunCounts,
    pub error_message: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    politicians: BTreeMap<i64, Politician>,
    expenses: Vec<RawExpense>,
    votes: Vec<RawVote>,
    propositions: BTreeMap<String, Proposition>,
    scores: HashMap<i64, Score>,
    score_writes: usize,
    sync_runs: Vec<RecordedRun>,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
    failing: HashSet<GatewayOp>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose `op` always returns an error.
    #[must_use]
    pub fn failing_on(op: GatewayOp) -> Self {
        Self {
            failing: HashSet::from([op]),
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, op: GatewayOp) -> Result<(), DbError> {
        if self.failing.contains(&op) {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(format!(
                "injected failure on {op:?}"
            ))));
        }
        Ok(())
    }

    pub fn insert_politicians(&self, politicians: impl IntoIterator<Item = Politician>) {
        let mut state = self.state();
        for p in politicians {
            state.politicians.insert(p.id, p);
        }
    }

    pub fn insert_expenses(&self, expenses: impl IntoIterator<Item = RawExpense>) {
        self.state().expenses.extend(expenses);
    }

    pub fn insert_votes(&self, votes: impl IntoIterator<Item = RawVote>) {
        self.state().votes.extend(votes);
    }

    pub fn insert_score(&self, score: Score) {
        self.state().scores.insert(score.politician_id, score);
    }

    #[must_use]
    pub fn politicians(&self) -> Vec<Politician> {
        self.state().politicians.values().cloned().collect()
    }

    #[must_use]
    pub fn expenses(&self) -> Vec<RawExpense> {
        self.state().expenses.clone()
    }

    #[must_use]
    pub fn votes(&self) -> Vec<RawVote> {
        self.state().votes.clone()
    }

    #[must_use]
    pub fn propositions(&self) -> Vec<Proposition> {
        self.state().propositions.values().cloned().collect()
    }

    #[must_use]
    pub fn sync_runs(&self) -> Vec<RecordedRun> {
        self.state().sync_runs.clone()
    }

    /// Applies `apply` to run `id` only while it is in status `from`,
    /// mirroring the conditional updates of the Postgres log.
    fn transition(
        &self,
        id: i64,
        from: &'static str,
        apply: impl FnOnce(&mut RecordedRun),
    ) -> Result<(), DbError> {
        let mut state = self.state();
        let run = state
            .sync_runs
            .iter_mut()
            .find(|r| r.id == id && r.status == from)
            .ok_or(DbError::InvalidSyncRunTransition {
                id,
                expected_status: from,
            })?;
        apply(run);
        Ok(())
    }

    /// Number of score writes so far, cache hits excluded.
    #[must_use]
    pub fn score_writes(&self) -> usize {
        self.state().score_writes
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn upsert_politicians(&self, politicians: &[Politician]) -> Result<u64, DbError> {
        self.check(GatewayOp::UpsertPoliticians)?;
        self.insert_politicians(politicians.iter().cloned());
        Ok(politicians.len() as u64)
    }

    async fn replace_expenses_for_year(
        &self,
        year: i32,
        expenses: &[RawExpense],
    ) -> Result<u64, DbError> {
        self.check(GatewayOp::ReplaceExpenses)?;
        let mut state = self.state();
        state.expenses.retain(|e| e.year != year);
        state.expenses.extend_from_slice(expenses);
        Ok(expenses.len() as u64)
    }

    async fn replace_votes_since(
        &self,
        since: NaiveDate,
        votes: &[RawVote],
    ) -> Result<u64, DbError> {
        self.check(GatewayOp::ReplaceVotes)?;
        let mut state = self.state();
        state.votes.retain(|v| v.date < since);
        state.votes.extend_from_slice(votes);
        Ok(votes.len() as u64)
    }

    async fn upsert_propositions(&self, propositions: &[Proposition]) -> Result<u64, DbError> {
        self.check(GatewayOp::UpsertPropositions)?;
        let mut state = self.state();
        for p in propositions {
            state.propositions.insert(p.id.clone(), p.clone());
        }
        Ok(propositions.len() as u64)
    }

    async fn get_politician(&self, id: i64) -> Result<Option<Politician>, DbError> {
        Ok(self.state().politicians.get(&id).cloned())
    }

    async fn list_politicians(&self) -> Result<Vec<Politician>, DbError> {
        let mut politicians = self.politicians();
        politicians.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(politicians)
    }

    async fn list_expenses(&self, period: PeriodFilter) -> Result<Vec<RawExpense>, DbError> {
        Ok(self
            .state()
            .expenses
            .iter()
            .filter(|e| period.matches(e.year, e.month))
            .cloned()
            .collect())
    }

    async fn list_votes(&self, period: PeriodFilter) -> Result<Vec<RawVote>, DbError> {
        Ok(self
            .state()
            .votes
            .iter()
            .filter(|v| period.matches_date(v.date))
            .cloned()
            .collect())
    }

    async fn expenses_since(
        &self,
        politician_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<RawExpense>, DbError> {
        Ok(self
            .state()
            .expenses
            .iter()
            .filter(|e| e.politician_id == politician_id && e.date >= since)
            .cloned()
            .collect())
    }

    async fn votes_since(
        &self,
        politician_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<RawVote>, DbError> {
        Ok(self
            .state()
            .votes
            .iter()
            .filter(|v| v.politician_id == politician_id && v.date >= since)
            .cloned()
            .collect())
    }

    async fn get_score(&self, politician_id: i64) -> Result<Option<Score>, DbError> {
        Ok(self.state().scores.get(&politician_id).cloned())
    }

    async fn upsert_score(&self, score: &Score) -> Result<(), DbError> {
        self.check(GatewayOp::UpsertScore)?;
        let mut state = self.state();
        state.scores.insert(score.politician_id, score.clone());
        state.score_writes += 1;
        Ok(())
    }

    async fn create_sync_run(&self, trigger_source: &str) -> Result<i64, DbError> {
        self.check(GatewayOp::CreateSyncRun)?;
        let mut state = self.state();
        let id = state.sync_runs.last().map_or(1, |r| r.id + 1);
        state.sync_runs.push(RecordedRun {
            id,
            trigger_source: trigger_source.to_string(),
            status: "queued",
            counts: SyncRunCounts::default(),
            error_message: None,
        });
        Ok(id)
    }

    async fn start_sync_run(&self, run_id: i64) -> Result<(), DbError> {
        self.transition(run_id, "queued", |run| run.status = "running")
    }

    async fn complete_sync_run(&self, run_id: i64, counts: SyncRunCounts) -> Result<(), DbError> {
        self.transition(run_id, "running", |run| {
            run.status = "succeeded";
            run.counts = counts;
        })
    }

    async fn fail_sync_run(&self, run_id: i64, message: &str) -> Result<(), DbError> {
        self.transition(run_id, "running", |run| {
            run.status = "failed";
            run.error_message = Some(message.to_string());
        })
    }
}
