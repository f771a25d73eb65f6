use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_CAMARA_BASE_URL: &str = "https://dadosabertos.camara.leg.br/api/v2";
const DEFAULT_SENADO_BASE_URL: &str = "https://legis.senado.leg.br/dadosabertos";
const DEFAULT_AI_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";
const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("FISCALIZA_ENV", "development"));

    let bind_addr = parse("FISCALIZA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FISCALIZA_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("FISCALIZA_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FISCALIZA_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FISCALIZA_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let camara_base_url = or_default("FISCALIZA_CAMARA_BASE_URL", DEFAULT_CAMARA_BASE_URL);
    let senado_base_url = or_default("FISCALIZA_SENADO_BASE_URL", DEFAULT_SENADO_BASE_URL);
    let source_timeout_secs = parse_u64("FISCALIZA_SOURCE_TIMEOUT_SECS", "30")?;
    let source_user_agent = or_default(
        "FISCALIZA_SOURCE_USER_AGENT",
        "fiscaliza/0.1 (civic-transparency)",
    );
    let source_max_retries = parse_u32("FISCALIZA_SOURCE_MAX_RETRIES", "2")?;
    let source_retry_backoff_ms = parse_u64("FISCALIZA_SOURCE_RETRY_BACKOFF_MS", "500")?;

    let sync_expense_sample = parse_usize("FISCALIZA_SYNC_EXPENSE_SAMPLE", "50")?;
    let sync_vote_sample = parse_usize("FISCALIZA_SYNC_VOTE_SAMPLE", "30")?;
    let sync_max_concurrent = parse_usize("FISCALIZA_SYNC_MAX_CONCURRENT", "8")?;
    let sync_cron = or_default("FISCALIZA_SYNC_CRON", "0 0 4 * * *");

    let ai_api_key = lookup("FISCALIZA_AI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let ai_base_url = or_default("FISCALIZA_AI_BASE_URL", DEFAULT_AI_BASE_URL);
    let ai_model = or_default("FISCALIZA_AI_MODEL", DEFAULT_AI_MODEL);

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        camara_base_url,
        senado_base_url,
        source_timeout_secs,
        source_user_agent,
        source_max_retries,
        source_retry_backoff_ms,
        sync_expense_sample,
        sync_vote_sample,
        sync_max_concurrent,
        sync_cron,
        ai_api_key,
        ai_base_url,
        ai_model,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
