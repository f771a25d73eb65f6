//! Live integration tests for fiscaliza-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx
//! test harness. They are ignored by default; run them with
//! `DATABASE_URL=... cargo test -p fiscaliza-db -- --ignored`.

use chrono::{NaiveDate, Utc};
use fiscaliza_core::{PeriodFilter, Politician, Proposition, RawExpense, RawVote, Role, Score};
use fiscaliza_db::{
    complete_sync_run, count_politicians, create_sync_run, fail_sync_run, get_politician,
    get_score, get_sync_run, latest_expenses_for_politician, list_expenses, list_politicians,
    list_recent_propositions, list_sync_runs, list_votes_since, replace_expenses_for_year,
    replace_votes_since, start_sync_run, total_expenses_for_politician, upsert_politicians,
    upsert_propositions, upsert_score, DbError, SyncRunCounts,
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn politician(id: i64, name: &str, state: &str, role: Role) -> Politician {
    Politician {
        id,
        name: name.to_string(),
        party: "PT".to_string(),
        state: state.to_string(),
        role,
        photo: None,
        email: None,
    }
}

fn expense(politician_id: i64, year: i32, month: u32, cents: i64) -> RawExpense {
    RawExpense {
        politician_id,
        year,
        month: i32::try_from(month).expect("month fits"),
        category: "TELEFONIA".to_string(),
        description: None,
        value: Decimal::new(cents, 2),
        date: day(year, month, 1),
    }
}

fn vote(politician_id: i64, date: NaiveDate) -> RawVote {
    RawVote {
        politician_id,
        proposition_id: "2270800".to_string(),
        proposition_title: "Votação".to_string(),
        vote: "Sim".to_string(),
        date,
    }
}

async fn seed_politicians(pool: &sqlx::PgPool) {
    upsert_politicians(
        pool,
        &[
            politician(1, "Bruna Costa", "SP", Role::Deputy),
            politician(2, "Ana Lima", "RJ", Role::Deputy),
            politician(5012, "Carlos Souza", "SP", Role::Senator),
        ],
    )
    .await
    .expect("seed politicians");
}

// ---------------------------------------------------------------------------
// politicians
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn upsert_politicians_overwrites_existing_rows(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;

    let mut renamed = politician(1, "Bruna Costa Lima", "SP", Role::Deputy);
    renamed.photo = Some("https://example.test/1.jpg".to_string());
    upsert_politicians(&pool, &[renamed]).await.expect("upsert");

    assert_eq!(count_politicians(&pool).await.expect("count"), 3);
    let stored = get_politician(&pool, 1)
        .await
        .expect("get")
        .expect("politician exists");
    assert_eq!(stored.name, "Bruna Costa Lima");
    assert!(stored.photo.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn list_politicians_filters_by_role_and_state(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;

    let all = list_politicians(&pool, None, None).await.expect("list");
    let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ana Lima", "Bruna Costa", "Carlos Souza"]);

    let sp_deputies = list_politicians(&pool, Some(Role::Deputy), Some("SP"))
        .await
        .expect("list");
    assert_eq!(sp_deputies.len(), 1);
    assert_eq!(sp_deputies[0].id, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn get_politician_returns_none_when_absent(pool: sqlx::PgPool) {
    assert!(get_politician(&pool, 999).await.expect("get").is_none());
}

// ---------------------------------------------------------------------------
// expenses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn replace_expenses_for_year_does_not_double_count(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;
    let batch = [expense(1, 2025, 1, 10_000), expense(2, 2025, 2, 5_000)];

    replace_expenses_for_year(&pool, 2025, &batch)
        .await
        .expect("first replace");
    replace_expenses_for_year(&pool, 2025, &batch)
        .await
        .expect("second replace");

    let rows = list_expenses(
        &pool,
        PeriodFilter {
            month: None,
            year: Some(2025),
        },
    )
    .await
    .expect("list");
    assert_eq!(rows.len(), 2);
    let total: Decimal = rows.iter().map(|r| r.value).sum();
    assert_eq!(total, Decimal::new(15_000, 2));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn replace_expenses_for_year_leaves_other_years(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;
    replace_expenses_for_year(&pool, 2024, &[expense(1, 2024, 12, 7_000)])
        .await
        .expect("seed 2024");
    replace_expenses_for_year(&pool, 2025, &[expense(1, 2025, 1, 1_000)])
        .await
        .expect("replace 2025");

    let total = total_expenses_for_politician(&pool, 1).await.expect("total");
    assert_eq!(total, Decimal::new(8_000, 2));

    let latest = latest_expenses_for_politician(&pool, 1, 1)
        .await
        .expect("latest");
    assert_eq!(latest[0].year, 2025);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn failed_insert_rolls_back_the_delete(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;
    replace_expenses_for_year(&pool, 2025, &[expense(1, 2025, 1, 1_000)])
        .await
        .expect("seed");

    // Unknown politician violates the foreign key inside the transaction.
    let result = replace_expenses_for_year(&pool, 2025, &[expense(404, 2025, 1, 1_000)]).await;
    assert!(matches!(result, Err(DbError::Sqlx(_))));

    let rows = list_expenses(&pool, PeriodFilter::all_time())
        .await
        .expect("list");
    assert_eq!(rows.len(), 1, "previous rows survive a failed replace");
    assert_eq!(rows[0].politician_id, 1);
}

// ---------------------------------------------------------------------------
// votes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn replace_votes_since_keeps_older_rows(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;
    let old = vote(1, day(2025, 1, 10));
    let recent = vote(1, day(2025, 6, 1));
    replace_votes_since(&pool, day(2025, 1, 1), &[old, recent.clone()])
        .await
        .expect("seed");

    replace_votes_since(&pool, day(2025, 5, 11), &[recent])
        .await
        .expect("replace window");

    let votes = list_votes_since(&pool, 1, day(2024, 1, 1))
        .await
        .expect("list");
    assert_eq!(votes.len(), 2);
    assert_eq!(votes[0].date, day(2025, 1, 10));
}

// ---------------------------------------------------------------------------
// propositions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn upsert_propositions_is_keyed_by_id(pool: sqlx::PgPool) {
    let mut prop = Proposition {
        id: "2501234".to_string(),
        kind: "PL".to_string(),
        number: "1087".to_string(),
        year: 2025,
        summary: "Sem descrição disponível".to_string(),
        author: "Câmara dos Deputados".to_string(),
        status: "Em tramitação".to_string(),
        date: day(2025, 6, 10),
    };
    upsert_propositions(&pool, std::slice::from_ref(&prop))
        .await
        .expect("insert");
    prop.summary = "Institui o programa".to_string();
    upsert_propositions(&pool, &[prop]).await.expect("update");

    let rows = list_recent_propositions(&pool, 10).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].summary, "Institui o programa");
    assert_eq!(rows[0].kind, "PL");
}

// ---------------------------------------------------------------------------
// scores
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn upsert_score_keeps_one_row_per_politician(pool: sqlx::PgPool) {
    seed_politicians(&pool).await;
    let mut score = Score {
        politician_id: 1,
        total: Decimal::new(625, 2),
        votes: Decimal::new(500, 2),
        expenses: Decimal::new(1_000, 2),
        litigation: Decimal::ZERO,
        other: Decimal::ZERO,
        calculated_at: Utc::now(),
    };
    upsert_score(&pool, &score).await.expect("insert");
    score.total = Decimal::new(725, 2);
    upsert_score(&pool, &score).await.expect("overwrite");

    let row = get_score(&pool, 1).await.expect("get").expect("row");
    assert_eq!(row.total_score, Decimal::new(725, 2));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM politician_scores")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// sync_runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn sync_run_lifecycle_succeeds(pool: sqlx::PgPool) {
    let run = create_sync_run(&pool, "cli").await.expect("create");
    assert_eq!(run.status, "queued");

    start_sync_run(&pool, run.id).await.expect("start");
    complete_sync_run(
        &pool,
        run.id,
        SyncRunCounts {
            politicians: 594,
            expenses: 2_400,
            votes: 600,
            propositions: 50,
            failed_fetches: 2,
        },
    )
    .await
    .expect("complete");

    let stored = get_sync_run(&pool, run.id).await.expect("get");
    assert_eq!(stored.status, "succeeded");
    assert_eq!(stored.politicians_count, 594);
    assert_eq!(stored.failed_fetches, 2);
    assert!(stored.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn sync_run_rejects_invalid_transitions(pool: sqlx::PgPool) {
    let run = create_sync_run(&pool, "scheduler").await.expect("create");

    let err = fail_sync_run(&pool, run.id, "boom")
        .await
        .expect_err("queued run cannot fail");
    assert!(matches!(
        err,
        DbError::InvalidSyncRunTransition {
            expected_status: "running",
            ..
        }
    ));

    start_sync_run(&pool, run.id).await.expect("start");
    fail_sync_run(&pool, run.id, "camara unavailable")
        .await
        .expect("fail");
    let runs = list_sync_runs(&pool, 5).await.expect("list");
    assert_eq!(runs[0].status, "failed");
    assert_eq!(runs[0].error_message.as_deref(), Some("camara unavailable"));
}
