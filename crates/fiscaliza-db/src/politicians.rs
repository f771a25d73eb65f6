//! Database operations for the `politicians` table.

use chrono::{DateTime, Utc};
use fiscaliza_core::{Politician, Role};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PoliticianRow {
    pub id: i64,
    pub name: String,
    pub party: String,
    pub state: String,
    pub role: String,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PoliticianRow> for Politician {
    type Error = DbError;

    fn try_from(row: PoliticianRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| DbError::InvalidColumn {
            column: "politicians.role",
            value: row.role.clone(),
        })?;
        Ok(Politician {
            id: row.id,
            name: row.name,
            party: row.party,
            state: row.state,
            role,
            photo: row.photo,
            email: row.email,
        })
    }
}

fn into_politicians(rows: Vec<PoliticianRow>) -> Result<Vec<Politician>, DbError> {
    rows.into_iter().map(Politician::try_from).collect()
}

/// Upserts the whole batch in one `INSERT … SELECT FROM UNNEST` statement.
///
/// Existing rows are overwritten wholesale. The caller must not pass the
/// same `id` twice; Postgres rejects a batch that updates a row twice.
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_politicians(pool: &PgPool, politicians: &[Politician]) -> Result<u64, DbError> {
    if politicians.is_empty() {
        return Ok(0);
    }

    let mut ids: Vec<i64> = Vec::with_capacity(politicians.len());
    let mut names: Vec<String> = Vec::with_capacity(politicians.len());
    let mut parties: Vec<String> = Vec::with_capacity(politicians.len());
    let mut states: Vec<String> = Vec::with_capacity(politicians.len());
    let mut roles: Vec<String> = Vec::with_capacity(politicians.len());
    let mut photos: Vec<Option<String>> = Vec::with_capacity(politicians.len());
    let mut emails: Vec<Option<String>> = Vec::with_capacity(politicians.len());

    for p in politicians {
        ids.push(p.id);
        names.push(p.name.clone());
        parties.push(p.party.clone());
        states.push(p.state.clone());
        roles.push(p.role.as_str().to_string());
        photos.push(p.photo.clone());
        emails.push(p.email.clone());
    }

    let result = sqlx::query(
        "INSERT INTO politicians (id, name, party, state, role, photo, email) \
         SELECT * FROM UNNEST(\
              $1::int8[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[]) \
         ON CONFLICT (id) DO UPDATE SET \
             name       = EXCLUDED.name, \
             party      = EXCLUDED.party, \
             state      = EXCLUDED.state, \
             role       = EXCLUDED.role, \
             photo      = EXCLUDED.photo, \
             email      = EXCLUDED.email, \
             updated_at = NOW()",
    )
    .bind(&ids)
    .bind(&names)
    .bind(&parties)
    .bind(&states)
    .bind(&roles)
    .bind(&photos)
    .bind(&emails)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Lists politicians ordered by name, optionally narrowed by role and state.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidColumn`] if a stored role is not recognised.
pub async fn list_politicians(
    pool: &PgPool,
    role: Option<Role>,
    state: Option<&str>,
) -> Result<Vec<Politician>, DbError> {
    let rows = sqlx::query_as::<_, PoliticianRow>(
        "SELECT id, name, party, state, role, photo, email, updated_at \
         FROM politicians \
         WHERE ($1::text IS NULL OR role = $1) \
           AND ($2::text IS NULL OR state = $2) \
         ORDER BY name, id",
    )
    .bind(role.map(Role::as_str))
    .bind(state)
    .fetch_all(pool)
    .await?;

    into_politicians(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidColumn`] if the stored role is not recognised.
pub async fn get_politician(pool: &PgPool, id: i64) -> Result<Option<Politician>, DbError> {
    let row = sqlx::query_as::<_, PoliticianRow>(
        "SELECT id, name, party, state, role, photo, email, updated_at \
         FROM politicians \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Politician::try_from).transpose()
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_politicians(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM politicians")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
