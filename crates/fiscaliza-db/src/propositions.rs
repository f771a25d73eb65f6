//! Database operations for the `propositions` table.

use chrono::NaiveDate;
use fiscaliza_core::Proposition;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PropositionRow {
    pub id: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub number: String,
    pub year: i32,
    pub summary: String,
    pub author: String,
    pub status: String,
    pub date: NaiveDate,
}

impl From<PropositionRow> for Proposition {
    fn from(row: PropositionRow) -> Self {
        Proposition {
            id: row.id,
            kind: row.kind,
            number: row.number,
            year: row.year,
            summary: row.summary,
            author: row.author,
            status: row.status,
            date: row.date,
        }
    }
}

/// Upserts the batch keyed by `id`. Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_propositions(
    pool: &PgPool,
    propositions: &[Proposition],
) -> Result<u64, DbError> {
    if propositions.is_empty() {
        return Ok(0);
    }

    let mut ids: Vec<String> = Vec::with_capacity(propositions.len());
    let mut kinds: Vec<String> = Vec::with_capacity(propositions.len());
    let mut numbers: Vec<String> = Vec::with_capacity(propositions.len());
    let mut years: Vec<i32> = Vec::with_capacity(propositions.len());
    let mut summaries: Vec<String> = Vec::with_capacity(propositions.len());
    let mut authors: Vec<String> = Vec::with_capacity(propositions.len());
    let mut statuses: Vec<String> = Vec::with_capacity(propositions.len());
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(propositions.len());

    for p in propositions {
        ids.push(p.id.clone());
        kinds.push(p.kind.clone());
        numbers.push(p.number.clone());
        years.push(p.year);
        summaries.push(p.summary.clone());
        authors.push(p.author.clone());
        statuses.push(p.status.clone());
        dates.push(p.date);
    }

    let result = sqlx::query(
        "INSERT INTO propositions (id, type, number, year, summary, author, status, date) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::text[], $3::text[], $4::int4[], \
              $5::text[], $6::text[], $7::text[], $8::date[]) \
         ON CONFLICT (id) DO UPDATE SET \
             type       = EXCLUDED.type, \
             number     = EXCLUDED.number, \
             year       = EXCLUDED.year, \
             summary    = EXCLUDED.summary, \
             author     = EXCLUDED.author, \
             status     = EXCLUDED.status, \
             date       = EXCLUDED.date, \
             updated_at = NOW()",
    )
    .bind(&ids)
    .bind(&kinds)
    .bind(&numbers)
    .bind(&years)
    .bind(&summaries)
    .bind(&authors)
    .bind(&statuses)
    .bind(&dates)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Returns the `limit` most recent propositions, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_propositions(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PropositionRow>, DbError> {
    let rows = sqlx::query_as::<_, PropositionRow>(
        "SELECT id, type, number, year, summary, author, status, date \
         FROM propositions \
         ORDER BY date DESC, year DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
