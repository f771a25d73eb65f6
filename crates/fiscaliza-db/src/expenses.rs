//! Database operations for the `politician_expenses` table.

use chrono::NaiveDate;
use fiscaliza_core::{PeriodFilter, RawExpense};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseRow {
    pub id: i64,
    pub politician_id: i64,
    pub year: i32,
    pub month: i32,
    pub category: String,
    pub description: Option<String>,
    pub value: Decimal,
    pub date: NaiveDate,
}

impl From<ExpenseRow> for RawExpense {
    fn from(row: ExpenseRow) -> Self {
        RawExpense {
            politician_id: row.politician_id,
            year: row.year,
            month: row.month,
            category: row.category,
            description: row.description,
            value: row.value,
            date: row.date,
        }
    }
}

/// Replaces every stored expense for `year` with `expenses`.
///
/// The delete and the bulk insert run in one transaction, so readers see
/// either the old year or the new one. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails; the transaction is
/// rolled back and the previous rows remain.
pub async fn replace_expenses_for_year(
    pool: &PgPool,
    year: i32,
    expenses: &[RawExpense],
) -> Result<u64, DbError> {
    let mut politician_ids: Vec<i64> = Vec::with_capacity(expenses.len());
    let mut years: Vec<i32> = Vec::with_capacity(expenses.len());
    let mut months: Vec<i32> = Vec::with_capacity(expenses.len());
    let mut categories: Vec<String> = Vec::with_capacity(expenses.len());
    let mut descriptions: Vec<Option<String>> = Vec::with_capacity(expenses.len());
    let mut values: Vec<Decimal> = Vec::with_capacity(expenses.len());
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(expenses.len());

    for e in expenses {
        politician_ids.push(e.politician_id);
        years.push(e.year);
        months.push(e.month);
        categories.push(e.category.clone());
        descriptions.push(e.description.clone());
        values.push(e.value);
        dates.push(e.date);
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM politician_expenses WHERE year = $1")
        .bind(year)
        .execute(&mut *tx)
        .await?;

    let inserted = if expenses.is_empty() {
        0
    } else {
        sqlx::query(
            "INSERT INTO politician_expenses \
                 (politician_id, year, month, category, description, value, date) \
             SELECT * FROM UNNEST(\
                  $1::int8[], $2::int4[], $3::int4[], $4::text[], $5::text[], \
                  $6::numeric[], $7::date[])",
        )
        .bind(&politician_ids)
        .bind(&years)
        .bind(&months)
        .bind(&categories)
        .bind(&descriptions)
        .bind(&values)
        .bind(&dates)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    };

    tx.commit().await?;
    Ok(inserted)
}

/// Lists all expenses matching the period filter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_expenses(pool: &PgPool, period: PeriodFilter) -> Result<Vec<ExpenseRow>, DbError> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, politician_id, year, month, category, description, value, date \
         FROM politician_expenses \
         WHERE ($1::int4 IS NULL OR month = $1) \
           AND ($2::int4 IS NULL OR year = $2) \
         ORDER BY id",
    )
    .bind(period.month)
    .bind(period.year)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Lists one politician's expenses dated on or after `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_expenses_since(
    pool: &PgPool,
    politician_id: i64,
    since: NaiveDate,
) -> Result<Vec<ExpenseRow>, DbError> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, politician_id, year, month, category, description, value, date \
         FROM politician_expenses \
         WHERE politician_id = $1 AND date >= $2 \
         ORDER BY date, id",
    )
    .bind(politician_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the `limit` most recent expenses for a politician.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_expenses_for_politician(
    pool: &PgPool,
    politician_id: i64,
    limit: i64,
) -> Result<Vec<ExpenseRow>, DbError> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, politician_id, year, month, category, description, value, date \
         FROM politician_expenses \
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

/// Sum of every stored expense for a politician, zero when there are none.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn total_expenses_for_politician(
    pool: &PgPool,
    politician_id: i64,
) -> Result<Decimal, DbError> {
    let total = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(value), 0) FROM politician_expenses WHERE politician_id = $1",
    )
    .bind(politician_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}
