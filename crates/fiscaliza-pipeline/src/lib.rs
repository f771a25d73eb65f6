//! The data pipeline: sync orchestration, score calculation and the
//! expense/ranking aggregations.
//!
//! Everything here talks to the outside world through two seams,
//! [`LegislatureSource`] for the chamber APIs and [`Gateway`] for
//! persistence, so the same code runs against Postgres in production and
//! against [`memory::MemoryGateway`] in tests.

pub mod aggregate;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod recorded;
pub mod score;
pub mod source;
pub mod sync;

pub use aggregate::{
    expenses_by_category, expenses_by_party, load_expenses_by_category, load_expenses_by_party,
    load_ranking, load_top_spenders, ranking, ranking_score, top_spenders, CategoryTotal,
    PartyTotal, RankingEntry, RankingFilter, TopSpender, RANKING_SIZE,
};
pub use error::{FetchFailure, FetchStage, PipelineError};
pub use gateway::{Gateway, PgGateway};
pub use recorded::run_recorded_sync;
pub use score::{calculate_score, compute_score, ScoreOutcome, ScoreSource};
pub use source::{Legislature, LegislatureSource};
pub use sync::{run_sync, SyncOptions, SyncReport, SyncStats};
