mod report;
mod sync;

use clap::{Parser, Subcommand};
use fiscaliza_core::{Region, Role};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fiscaliza-cli")]
#[command(about = "Federal legislator transparency data: sync, scores and reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one sync pass against both legislature APIs
    Sync {
        /// Fetch and normalize without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Calculate (or read the cached) score for one politician
    Score {
        #[arg(long)]
        politician_id: i64,
    },
    /// Print spending by category, by party, and the top spenders
    Report {
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=12))]
        month: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
        /// Number of top spenders to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Print the top-10 ranking
    Ranking {
        /// State acronym (e.g., SP)
        #[arg(long)]
        state: Option<String>,
        /// norte, nordeste, centro-oeste, sudeste or sul
        #[arg(long)]
        region: Option<Region>,
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=12))]
        month: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// List stored politicians
    Politicians {
        /// deputado or senador
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        state: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("fiscaliza-cli: run with --help to list commands");
        return Ok(());
    };

    let config = fiscaliza_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Commands::Sync { dry_run: true } = command {
        return sync::run_dry_sync(&config).await;
    }

    let pool = fiscaliza_db::connect_pool_from_config(&config).await?;
    fiscaliza_db::run_migrations(&pool).await?;

    match command {
        Commands::Sync { .. } => sync::run_sync_command(&pool, &config).await,
        Commands::Score { politician_id } => report::run_score(&pool, politician_id).await,
        Commands::Report { month, year, limit } => {
            report::run_report(&pool, month, year, limit).await
        }
        Commands::Ranking {
            state,
            region,
            month,
            year,
        } => report::run_ranking(&pool, state, region, month, year).await,
        Commands::Politicians { role, state } => {
            report::run_politicians(&pool, role, state.as_deref()).await
        }
    }
}
