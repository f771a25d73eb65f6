//! Read-only commands: score, report, ranking, politicians.

use chrono::Utc;
use fiscaliza_core::{PeriodFilter, Region, Role};
use fiscaliza_pipeline::{
    calculate_score, load_expenses_by_category, load_expenses_by_party, load_ranking,
    load_top_spenders, PgGateway, RankingFilter,
};

fn period_label(period: PeriodFilter) -> String {
    match (period.month, period.year) {
        (Some(m), Some(y)) => format!("{m:02}/{y}"),
        (Some(m), None) => format!("month {m:02}, all years"),
        (None, Some(y)) => y.to_string(),
        (None, None) => "all time".to_string(),
    }
}

/// # Errors
///
/// Returns an error if the politician is unknown or the database fails.
pub(crate) async fn run_score(pool: &sqlx::PgPool, politician_id: i64) -> anyhow::Result<()> {
    let gateway = PgGateway::new(pool.clone());
    let outcome = calculate_score(&gateway, politician_id, Utc::now()).await?;
    let score = &outcome.score;

    println!("politician     {politician_id}");
    println!("total          {}", score.total);
    println!("votes          {}", score.votes);
    println!("expenses       {}", score.expenses);
    println!("litigation     {}", score.litigation);
    println!("other          {}", score.other);
    println!(
        "calculated_at  {}",
        score.calculated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("source         {:?}", outcome.source);
    Ok(())
}

/// Prints the three spending views for one period.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run_report(
    pool: &sqlx::PgPool,
    month: Option<i32>,
    year: Option<i32>,
    limit: usize,
) -> anyhow::Result<()> {
    let gateway = PgGateway::new(pool.clone());
    let period = PeriodFilter { month, year };

    let categories = load_expenses_by_category(&gateway, period).await?;
    if categories.is_empty() {
        println!(
            "no expenses stored for {}; run `sync` first",
            period_label(period)
        );
        return Ok(());
    }
    let parties = load_expenses_by_party(&gateway, period).await?;
    let top = load_top_spenders(&gateway, period, limit).await?;

    println!("# Expenses: {}", period_label(period));
    println!();
    println!("| Category | Total (R$) | Lines | % |");
    println!("|----------|------------|-------|---|");
    for c in &categories {
        println!(
            "| {} | {} | {} | {} |",
            c.category, c.total, c.count, c.percentage
        );
    }

    println!();
    println!("| Party | Total (R$) | Politicians | % |");
    println!("|-------|------------|-------------|---|");
    for p in &parties {
        println!(
            "| {} | {} | {} | {} |",
            p.party, p.total, p.politician_count, p.percentage
        );
    }

    println!();
    println!("| Politician | Party | UF | Total (R$) |");
    println!("|------------|-------|----|------------|");
    for s in &top {
        println!(
            "| {} | {} | {} | {} |",
            s.politician_name, s.party, s.state, s.total
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run_ranking(
    pool: &sqlx::PgPool,
    state: Option<String>,
    region: Option<Region>,
    month: Option<i32>,
    year: Option<i32>,
) -> anyhow::Result<()> {
    let gateway = PgGateway::new(pool.clone());
    let filter = RankingFilter {
        state,
        region,
        period: PeriodFilter { month, year },
    };

    let entries = load_ranking(&gateway, &filter).await?;
    if entries.is_empty() {
        println!("no politicians match the filter");
        return Ok(());
    }

    println!(
        "{:<5}{:<35}{:<10}{:<5}{:>6}{:>7}{:>14}",
        "#", "NAME", "PARTY", "UF", "SCORE", "VOTES", "EXPENSES"
    );
    for e in &entries {
        println!(
            "{:<5}{:<35}{:<10}{:<5}{:>6}{:>7}{:>14}",
            e.rank, e.name, e.party, e.state, e.score, e.votes, e.expenses
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_politicians(
    pool: &sqlx::PgPool,
    role: Option<Role>,
    state: Option<&str>,
) -> anyhow::Result<()> {
    let uf = state.map(str::to_uppercase);
    let politicians = fiscaliza_db::list_politicians(pool, role, uf.as_deref()).await?;

    if politicians.is_empty() {
        println!("no politicians stored; run `sync` first");
        return Ok(());
    }

    println!("{:<10}{:<4}{:<35}{:<10}{:<5}ROLE", "ID", "", "NAME", "PARTY", "UF");
    for p in &politicians {
        println!(
            "{:<10}{:<4}{:<35}{:<10}{:<5}{}",
            p.id,
            p.initials(),
            p.name,
            p.party,
            p.state,
            p.role
        );
    }
    println!();
    println!("{} politicians", politicians.len());
    Ok(())
}
