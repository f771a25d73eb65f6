//! Database operations for the `politician_votes` table.

use chrono::NaiveDate;
use fiscaliza_core::{PeriodFilter, RawVote};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VoteRow {
    pub id: i64,
    pub politician_id: i64,
    pub proposition_id: String,
    pub proposition_title: String,
    pub vote: String,
    pub date: NaiveDate,
}

impl From<VoteRow> for RawVote {
    fn from(row: VoteRow) -> Self {
        RawVote {
            politician_id: row.politician_id,
            proposition_id: row.proposition_id,
            proposition_title: row.proposition_title,
            vote: row.vote,
            date: row.date,
        }
    }
}

/// Replaces every stored vote dated on or after `since` with `votes`.
///
/// Older rows are untouched. Delete and insert share one transaction.
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails; the transaction is
/// rolled back.
pub async fn replace_votes_since(
    pool: &PgPool,
    since: NaiveDate,
    votes: &[RawVote],
) -> Result<u64, DbError> {
    let mut politician_ids: Vec<i64> = Vec::with_capacity(votes.len());
    let mut proposition_ids: Vec<String> = Vec::with_capacity(votes.len());
    let mut titles: Vec<String> = Vec::with_capacity(votes.len());
    let mut labels: Vec<String> = Vec::with_capacity(votes.len());
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(votes.len());

    for v in votes {
        politician_ids.push(v.politician_id);
        proposition_ids.push(v.proposition_id.clone());
        titles.push(v.proposition_title.clone());
        labels.push(v.vote.clone());
        dates.push(v.date);
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM politician_votes WHERE date >= $1")
        .bind(since)
        .execute(&mut *tx)
        .await?;

    let inserted = if votes.is_empty() {
        0
    } else {
        sqlx::query(
            "INSERT INTO politician_votes \
                 (politician_id, proposition_id, proposition_title, vote, date) \
             SELECT * FROM UNNEST($1::int8[], $2::text[], $3::text[], $4::text[], $5::date[])",
        )
        .bind(&politician_ids)
        .bind(&proposition_ids)
        .bind(&titles)
        .bind(&labels)
        .bind(&dates)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    };

    tx.commit().await?;
    Ok(inserted)
}

/// Lists every vote whose date falls in the period.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_votes(pool: &PgPool, period: PeriodFilter) -> Result<Vec<VoteRow>, DbError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT id, politician_id, proposition_id, proposition_title, vote, date \
         FROM politician_votes \
         WHERE ($1::int4 IS NULL OR EXTRACT(MONTH FROM date)::int4 = $1) \
           AND ($2::int4 IS NULL OR EXTRACT(YEAR FROM date)::int4 = $2) \
         ORDER BY id",
    )
    .bind(period.month)
    .bind(period.year)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Lists one politician's votes dated on or after `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_votes_since(
    pool: &PgPool,
    politician_id: i64,
    since: NaiveDate,
) -> Result<Vec<VoteRow>, DbError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT id, politician_id, proposition_id, proposition_title, vote, date \
         FROM politician_votes \
         WHERE politician_id = $1 AND date >= $2 \
         ORDER BY date, id",
    )
    .bind(politician_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_votes_for_politician(
    pool: &PgPool,
    politician_id: i64,
    limit: i64,
) -> Result<Vec<VoteRow>, DbError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT id, politician_id, proposition_id, proposition_title, vote, date \
         FROM politician_votes \
         WHERE politician_id = $1 \
         ORDER BY date DESC, id DESC \
         LIMIT $2",
    )
    .bind(politician_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_votes_for_politician(pool: &PgPool, politician_id: i64) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM politician_votes WHERE politician_id = $1",
    )
    .bind(politician_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
