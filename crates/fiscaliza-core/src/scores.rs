//! Cached reputation score record.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How long a calculated score is served from cache.
pub const SCORE_TTL_HOURS: i64 = 24;

/// One politician's score as last calculated.
///
/// Field names on the wire follow the public score payload
/// (`score_total`, `votacoes`, `gastos`, `processos`, `outros`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub politician_id: i64,
    #[serde(rename = "score_total", with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "votacoes", with = "rust_decimal::serde::float")]
    pub votes: Decimal,
    #[serde(rename = "gastos", with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    /// Always zero until a litigation source exists.
    #[serde(rename = "processos", with = "rust_decimal::serde::float")]
    pub litigation: Decimal,
    #[serde(rename = "outros", with = "rust_decimal::serde::float")]
    pub other: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl Score {
    /// `true` while `now` is strictly less than 24 hours after `calculated_at`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.calculated_at < Duration::hours(SCORE_TTL_HOURS)
    }
}
