//! Score calculator cache behavior against the in-memory gateway.

mod support;

use chrono::{Duration, TimeZone, Utc};
use fiscaliza_core::Role;
use fiscaliza_pipeline::memory::MemoryGateway;
use fiscaliza_pipeline::{calculate_score, PipelineError, ScoreSource};
use rust_decimal::Decimal;
use support::{day, expense, politician, vote};

fn seeded_gateway() -> MemoryGateway {
    let gateway = MemoryGateway::new();
    gateway.insert_politicians([politician(1, "Ana Maria Silva", "SP", Role::Deputy)]);
    gateway
}

#[tokio::test]
async fn no_activity_scores_six_twenty_five() {
    let gateway = seeded_gateway();
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

    let outcome = calculate_score(&gateway, 1, now).await.expect("score");

    assert_eq!(outcome.source, ScoreSource::Calculated);
    assert_eq!(outcome.score.total, Decimal::new(625, 2));
    assert_eq!(gateway.score_writes(), 1);
}

#[tokio::test]
async fn second_call_within_a_day_hits_the_cache() {
    let gateway = seeded_gateway();
    gateway.insert_votes([vote(1, "Sim", day(2025, 5, 1)), vote(1, "Não", day(2025, 5, 2))]);
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

    let first = calculate_score(&gateway, 1, now).await.expect("first");
    let second = calculate_score(&gateway, 1, now + Duration::hours(23))
        .await
        .expect("second");

    assert_eq!(second.source, ScoreSource::Cache);
    assert_eq!(second.score, first.score);
    assert_eq!(gateway.score_writes(), 1);
}

#[tokio::test]
async fn stale_cache_recomputes_to_the_same_total() {
    let gateway = seeded_gateway();
    gateway.insert_expenses([expense(1, 2025, 3, 300_000)]);
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

    let first = calculate_score(&gateway, 1, now).await.expect("first");
    let later = calculate_score(&gateway, 1, now + Duration::hours(25))
        .await
        .expect("later");

    assert_eq!(later.source, ScoreSource::Calculated);
    assert_eq!(later.score.total, first.score.total);
    assert_eq!(later.score.expenses, Decimal::from(5));
    assert_eq!(gateway.score_writes(), 2);
}

#[tokio::test]
async fn data_older_than_twelve_months_is_ignored() {
    let gateway = seeded_gateway();
    gateway.insert_votes([vote(1, "Não", day(2024, 1, 1))]);
    gateway.insert_expenses([expense(1, 2024, 1, 1_000_000)]);
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

    let outcome = calculate_score(&gateway, 1, now).await.expect("score");

    assert_eq!(outcome.score.total, Decimal::new(625, 2));
}

#[tokio::test]
async fn unknown_politician_is_not_found_and_not_cached() {
    let gateway = MemoryGateway::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

    let err = calculate_score(&gateway, 42, now)
        .await
        .expect_err("missing politician");

    assert!(matches!(err, PipelineError::NotFound { politician_id: 42 }));
    assert_eq!(gateway.score_writes(), 0);
}
