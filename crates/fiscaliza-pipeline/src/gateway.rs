//! The seam between the pipeline and persistence.
//!
//! [`PgGateway`] forwards to the `fiscaliza-db` free functions; tests use
//! [`crate::memory::MemoryGateway`].

use async_trait::async_trait;
use chrono::NaiveDate;
use fiscaliza_core::{PeriodFilter, Politician, Proposition, RawExpense, RawVote, Score};
use fiscaliza_db::{DbError, SyncRunCounts};
use sqlx::PgPool;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn upsert_politicians(&self, politicians: &[Politician]) -> Result<u64, DbError>;

    /// Deletes every expense for `year`, then inserts `expenses`.
    async fn replace_expenses_for_year(
        &self,
        year: i32,
        expenses: &[RawExpense],
    ) -> Result<u64, DbError>;

    /// Deletes every vote dated on or after `since`, then inserts `votes`.
    async fn replace_votes_since(&self, since: NaiveDate, votes: &[RawVote])
        -> Result<u64, DbError>;

    async fn upsert_propositions(&self, propositions: &[Proposition]) -> Result<u64, DbError>;

    async fn get_politician(&self, id: i64) -> Result<Option<Politician>, DbError>;

    async fn list_politicians(&self) -> Result<Vec<Politician>, DbError>;

    async fn list_expenses(&self, period: PeriodFilter) -> Result<Vec<RawExpense>, DbError>;

    async fn list_votes(&self, period: PeriodFilter) -> Result<Vec<RawVote>, DbError>;

    async fn expenses_since(
        &self,
        politician_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<RawExpense>, DbError>;

    async fn votes_since(&self, politician_id: i64, since: NaiveDate)
        -> Result<Vec<RawVote>, DbError>;

    async fn get_score(&self, politician_id: i64) -> Result<Option<Score>, DbError>;

    async fn upsert_score(&self, score: &Score) -> Result<(), DbError>;

    /// Creates a queued run and returns its id.
    async fn create_sync_run(&self, trigger_source: &str) -> Result<i64, DbError>;

    async fn start_sync_run(&self, run_id: i64) -> Result<(), DbError>;

    async fn complete_sync_run(&self, run_id: i64, counts: SyncRunCounts) -> Result<(), DbError>;

    async fn fail_sync_run(&self, run_id: i64, message: &str) -> Result<(), DbError>;
}

/// Postgres-backed gateway.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn upsert_politicians(&self, politicians: &[Politician]) -> Result<u64, DbError> {
        fiscaliza_db::upsert_politicians(&self.pool, politicians).await
    }

    async fn replace_expenses_for_year(
        &self,
        year: i32,
        expenses: &[RawExpense],
    ) -> Result<u64, DbError> {
        fiscaliza_db::replace_expenses_for_year(&self.pool, year, expenses).await
    }

    async fn replace_votes_since(
        &self,
        since: NaiveDate,
        votes: &[RawVote],
    ) -> Result<u64, DbError> {
        fiscaliza_db::replace_votes_since(&self.pool, since, votes).await
    }

    async fn upsert_propositions(&self, propositions: &[Proposition]) -> Result<u64, DbError> {
        fiscaliza_db::upsert_propositions(&self.pool, propositions).await
    }

    async fn get_politician(&self, id: i64) -> Result<Option<Politician>, DbError> {
        fiscaliza_db::get_politician(&self.pool, id).await
    }

    async fn list_politicians(&self) -> Result<Vec<Politician>, DbError> {
        fiscaliza_db::list_politicians(&self.pool, None, None).await
    }

    async fn list_expenses(&self, period: PeriodFilter) -> Result<Vec<RawExpense>, DbError> {
        let rows = fiscaliza_db::list_expenses(&self.pool, period).await?;
        Ok(rows.into_iter().map(RawExpense::from).collect())
    }

    async fn list_votes(&self, period: PeriodFilter) -> Result<Vec<RawVote>, DbError> {
        let rows = fiscaliza_db::list_votes(&self.pool, period).await?;
        Ok(rows.into_iter().map(RawVote::from).collect())
    }

    async fn expenses_since(
        &self,
        politician_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<RawExpense>, DbError> {
        let rows = fiscaliza_db::list_expenses_since(&self.pool, politician_id, since).await?;
        Ok(rows.into_iter().map(RawExpense::from).collect())
    }

    async fn votes_since(
        &self,
        politician_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<RawVote>, DbError> {
        let rows = fiscaliza_db::list_votes_since(&self.pool, politician_id, since).await?;
        Ok(rows.into_iter().map(RawVote::from).collect())
    }

    async fn get_score(&self, politician_id: i64) -> Result<Option<Score>, DbError> {
        let row = fiscaliza_db::get_score(&self.pool, politician_id).await?;
        Ok(row.map(Score::from))
    }

    async fn upsert_score(&self, score: &Score) -> Result<(), DbError> {
        fiscaliza_db::upsert_score(&self.pool, score).await
    }

    async fn create_sync_run(&self, trigger_source: &str) -> Result<i64, DbError> {
        let row = fiscaliza_db::create_sync_run(&self.pool, trigger_source).await?;
        Ok(row.id)
    }

    async fn start_sync_run(&self, run_id: i64) -> Result<(), DbError> {
        fiscaliza_db::start_sync_run(&self.pool, run_id).await
    }

    async fn complete_sync_run(&self, run_id: i64, counts: SyncRunCounts) -> Result<(), DbError> {
        fiscaliza_db::complete_sync_run(&self.pool, run_id, counts).await
    }

    async fn fail_sync_run(&self, run_id: i64, message: &str) -> Result<(), DbError> {
        fiscaliza_db::fail_sync_run(&self.pool, run_id, message).await
    }
}
