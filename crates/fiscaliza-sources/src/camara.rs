//! Connector for the Câmara dos Deputados open-data API (v2).
//!
//! Every list endpoint returns `{"dados": [...]}`; the client unwraps the
//! envelope and hands entries to [`crate::normalize`].

use chrono::NaiveDate;
use fiscaliza_core::{Politician, Proposition, RawExpense, RawVote};

use crate::client::{JsonClient, SourceConfig};
use crate::error::SourceError;
use crate::normalize::{
    dedupe_by_id, normalize_deputy, normalize_expense, normalize_proposition, normalize_vote,
};
use crate::types::{CamaraEnvelope, Deputado, Despesa, Proposicao, Votacao};

pub const DEFAULT_BASE_URL: &str = "https://dadosabertos.camara.leg.br/api/v2";

/// Upper bound on the deputy list; the chamber has 513 seats.
const DEPUTY_PAGE_SIZE: &str = "513";
const EXPENSE_PAGE_SIZE: &str = "50";
const VOTE_PAGE_SIZE: &str = "20";

/// Client for the lower-chamber API.
///
/// Use [`CamaraClient::new`] with the configured base URL, or point it at a
/// mock server in tests.
pub struct CamaraClient {
    http: JsonClient,
}

impl CamaraClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest` client cannot be built
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(config: &SourceConfig, base_url: &str) -> Result<Self, SourceError> {
        Ok(Self {
            http: JsonClient::new(config, base_url)?,
        })
    }

    /// Lists sitting deputies ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_deputies(&self) -> Result<Vec<Politician>, SourceError> {
        let url = self.http.build_url(
            "deputados",
            &[
                ("ordem", "ASC"),
                ("ordenarPor", "nome"),
                ("itens", DEPUTY_PAGE_SIZE),
            ],
        )?;
        let envelope: CamaraEnvelope<Deputado> = self.http.get_json(&url).await?;
        let deputies: Vec<Politician> = envelope.dados.iter().map(normalize_deputy).collect();
        tracing::debug!(count = deputies.len(), "camara: fetched deputies");
        Ok(dedupe_by_id(deputies))
    }

    /// Fetches the first page of a deputy's expenses for `year`.
    ///
    /// Lines without a usable month are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_expenses(
        &self,
        politician_id: i64,
        year: i32,
    ) -> Result<Vec<RawExpense>, SourceError> {
        let year_param = year.to_string();
        let url = self.http.build_url(
            &format!("deputados/{politician_id}/despesas"),
            &[("ano", &year_param), ("itens", EXPENSE_PAGE_SIZE)],
        )?;
        let envelope: CamaraEnvelope<Despesa> = self.http.get_json(&url).await?;

        let total = envelope.dados.len();
        let expenses: Vec<RawExpense> = envelope
            .dados
            .iter()
            .filter_map(|d| normalize_expense(politician_id, d, year))
            .collect();
        if expenses.len() < total {
            tracing::warn!(
                politician_id,
                dropped = total - expenses.len(),
                "camara: dropped expense lines without a valid month"
            );
        }
        Ok(expenses)
    }

    /// Fetches a deputy's most recent votes, newest first.
    ///
    /// `today` stands in for votes whose timestamp is missing.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_votes(
        &self,
        politician_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<RawVote>, SourceError> {
        let url = self.http.build_url(
            &format!("deputados/{politician_id}/votacoes"),
            &[
                ("ordem", "DESC"),
                ("ordenarPor", "dataHoraVoto"),
                ("itens", VOTE_PAGE_SIZE),
            ],
        )?;
        let envelope: CamaraEnvelope<Votacao> = self.http.get_json(&url).await?;
        Ok(envelope
            .dados
            .iter()
            .map(|v| normalize_vote(politician_id, v, today))
            .collect())
    }

    /// Fetches the most recent propositions by descending id.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_recent_propositions(
        &self,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Vec<Proposition>, SourceError> {
        let limit_param = limit.to_string();
        let url = self.http.build_url(
            "proposicoes",
            &[
                ("ordem", "DESC"),
                ("ordenarPor", "id"),
                ("itens", &limit_param),
            ],
        )?;
        let envelope: CamaraEnvelope<Proposicao> = self.http.get_json(&url).await?;
        Ok(envelope
            .dados
            .iter()
            .filter_map(|p| normalize_proposition(p, today))
            .collect())
    }
}
