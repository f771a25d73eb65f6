//! `sync` command handlers.

use chrono::Utc;
use fiscaliza_core::AppConfig;
use fiscaliza_pipeline::memory::MemoryGateway;
use fiscaliza_pipeline::{
    run_recorded_sync, run_sync, Legislature, PgGateway, SyncOptions, SyncReport,
};

/// Runs a recorded sync pass against Postgres.
///
/// # Errors
///
/// Returns an error if the sources cannot be reached or persistence fails.
pub(crate) async fn run_sync_command(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let source = Legislature::from_app_config(config)?;
    let options = SyncOptions::from_app_config(config);
    let today = Utc::now().date_naive();

    let gateway = PgGateway::new(pool.clone());

    let report = run_recorded_sync(&gateway, &source, &options, today, "cli").await?;
    print_report(&report);
    Ok(())
}

/// Fetches and normalizes into memory only; nothing is written.
///
/// # Errors
///
/// Returns an error if a member list cannot be fetched.
pub(crate) async fn run_dry_sync(config: &AppConfig) -> anyhow::Result<()> {
    let source = Legislature::from_app_config(config)?;
    let options = SyncOptions::from_app_config(config);
    let gateway = MemoryGateway::new();

    let report = run_sync(&source, &gateway, &options, Utc::now().date_naive()).await?;
    println!("[dry-run] nothing was written to the database");
    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    let stats = report.stats;
    println!("{:<15}{:>8}", "politicians", stats.politicians);
    println!("{:<15}{:>8}", "expenses", stats.expenses);
    println!("{:<15}{:>8}", "votes", stats.votes);
    println!("{:<15}{:>8}", "propositions", stats.propositions);

    if !report.failures.is_empty() {
        println!();
        println!("{} fetches failed:", report.failures.len());
        for failure in &report.failures {
            println!(
                "  {:<10}{:<10}{}",
                failure.stage, failure.politician_id, failure.message
            );
        }
    }
}
