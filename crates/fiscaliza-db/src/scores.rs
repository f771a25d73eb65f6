//! Database operations for the `politician_scores` cache table.

use chrono::{DateTime, Utc};
use fiscaliza_core::Score;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoreRow {
    pub politician_id: i64,
    pub total_score: Decimal,
    pub vote_score: Decimal,
    pub expense_score: Decimal,
    pub litigation_score: Decimal,
    pub other_score: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl From<ScoreRow> for Score {
    fn from(row: ScoreRow) -> Self {
        Score {
            politician_id: row.politician_id,
            total: row.total_score,
            votes: row.vote_score,
            expenses: row.expense_score,
            litigation: row.litigation_score,
            other: row.other_score,
            calculated_at: row.calculated_at,
        }
    }
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_score(pool: &PgPool, politician_id: i64) -> Result<Option<ScoreRow>, DbError> {
    let row = sqlx::query_as::<_, ScoreRow>(
        "SELECT politician_id, total_score, vote_score, expense_score, \
                litigation_score, other_score, calculated_at \
         FROM politician_scores \
         WHERE politician_id = $1",
    )
    .bind(politician_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Writes the score, overwriting any previous row for the politician.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_score(pool: &PgPool, score: &Score) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO politician_scores \
             (politician_id, total_score, vote_score, expense_score, \
              litigation_score, other_score, calculated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (politician_id) DO UPDATE SET \
             total_score      = EXCLUDED.total_score, \
             vote_score       = EXCLUDED.vote_score, \
             expense_score    = EXCLUDED.expense_score, \
             litigation_score = EXCLUDED.litigation_score, \
             other_score      = EXCLUDED.other_score, \
             calculated_at    = EXCLUDED.calculated_at",
    )
    .bind(score.politician_id)
    .bind(score.total)
    .bind(score.votes)
    .bind(score.expenses)
    .bind(score.litigation)
    .bind(score.other)
    .bind(score.calculated_at)
    .execute(pool)
    .await?;

    Ok(())
}
