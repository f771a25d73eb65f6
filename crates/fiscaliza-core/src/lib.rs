//! Shared domain types and configuration for fiscaliza.
//!
//! Every other crate in the workspace speaks in these types: the source
//! connectors produce them, the database layer persists them, and the
//! pipeline derives scores and aggregations from them.

pub mod app_config;
pub mod config;
pub mod politicians;
pub mod records;
pub mod scores;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use politicians::{initials, Politician, Region, Role};
pub use records::{PeriodFilter, Proposition, RawExpense, RawVote};
pub use scores::Score;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid role: {0}")]
    InvalidRole(String),
    #[error("invalid region: {0}")]
    InvalidRegion(String),
}
