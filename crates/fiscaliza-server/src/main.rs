mod api;
mod middleware;
mod scheduler;
mod sync;

use std::sync::Arc;

use fiscaliza_pipeline::{Legislature, PgGateway, SyncOptions};
use fiscaliza_simplify::Simplifier;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(fiscaliza_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = fiscaliza_db::connect_pool_from_config(&config).await?;
    fiscaliza_db::run_migrations(&pool).await?;

    let state = AppState {
        pool: pool.clone(),
        gateway: Arc::new(PgGateway::new(pool.clone())),
        source: Arc::new(Legislature::from_app_config(&config)?),
        simplifier: Arc::new(Simplifier::from_app_config(&config)?),
        sync_options: SyncOptions::from_app_config(&config),
        sync_guard: Arc::default(),
    };

    let _scheduler = scheduler::build_scheduler(state.clone(), &config.sync_cron).await?;

    if fiscaliza_db::count_politicians(&pool).await? == 0 {
        tracing::info!("no politicians stored; running an initial sync in the background");
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = sync::run_exclusive_sync(&state, "startup").await {
                tracing::error!(error = %e, "initial sync failed");
            }
        });
    }

    let app = build_app(state);

    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        "fiscaliza-server listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
