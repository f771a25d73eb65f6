//! The seam between the pipeline and the two legislature APIs.

use async_trait::async_trait;
use chrono::NaiveDate;
use fiscaliza_core::{AppConfig, Politician, Proposition, RawExpense, RawVote};
use fiscaliza_sources::{CamaraClient, SenadoClient, SourceConfig, SourceError};

/// Everything the sync needs from upstream.
///
/// Member sub-resources (expenses, votes) and propositions only exist on
/// the lower chamber's API.
#[async_trait]
pub trait LegislatureSource: Send + Sync {
    async fn fetch_deputies(&self) -> Result<Vec<Politician>, SourceError>;

    async fn fetch_senators(&self) -> Result<Vec<Politician>, SourceError>;

    async fn fetch_expenses(
        &self,
        politician_id: i64,
        year: i32,
    ) -> Result<Vec<RawExpense>, SourceError>;

    async fn fetch_votes(
        &self,
        politician_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<RawVote>, SourceError>;

    async fn fetch_recent_propositions(
        &self,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Vec<Proposition>, SourceError>;
}

/// The live source: both chambers' HTTP clients.
pub struct Legislature {
    camara: CamaraClient,
    senado: SenadoClient,
}

impl Legislature {
    #[must_use]
    pub fn new(camara: CamaraClient, senado: SenadoClient) -> Self {
        Self { camara, senado }
    }

    /// Builds both clients from the configured base URLs and HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if either client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SourceError> {
        let source_config = SourceConfig::from_app_config(config);
        Ok(Self {
            camara: CamaraClient::new(&source_config, &config.camara_base_url)?,
            senado: SenadoClient::new(&source_config, &config.senado_base_url)?,
        })
    }
}

#[async_trait]
impl LegislatureSource for Legislature {
    async fn fetch_deputies(&self) -> Result<Vec<Politician>, SourceError> {
        self.camara.fetch_deputies().await
    }

    async fn fetch_senators(&self) -> Result<Vec<Politician>, SourceError> {
        self.senado.fetch_senators().await
    }

    async fn fetch_expenses(
        &self,
        politician_id: i64,
        year: i32,
    ) -> Result<Vec<RawExpense>, SourceError> {
        self.camara.fetch_expenses(politician_id, year).await
    }

    async fn fetch_votes(
        &self,
        politician_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<RawVote>, SourceError> {
        self.camara.fetch_votes(politician_id, today).await
    }

    async fn fetch_recent_propositions(
        &self,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Vec<Proposition>, SourceError> {
        self.camara.fetch_recent_propositions(limit, today).await
    }
}
