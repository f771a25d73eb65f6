//! Connector for the Senado Federal open-data API.

use fiscaliza_core::Politician;

use crate::client::{JsonClient, SourceConfig};
use crate::error::SourceError;
use crate::normalize::{dedupe_by_id, normalize_senator};
use crate::types::SenadoListResponse;

pub const DEFAULT_BASE_URL: &str = "https://legis.senado.leg.br/dadosabertos";

pub struct SenadoClient {
    http: JsonClient,
}

impl SenadoClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest` client cannot be built
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(config: &SourceConfig, base_url: &str) -> Result<Self, SourceError> {
        Ok(Self {
            http: JsonClient::new(config, base_url)?,
        })
    }

    /// Lists senators currently in office.
    ///
    /// Entries without a numeric code are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on network failure, non-2xx status, or a body
    /// missing the `ListaParlamentarEmExercicio.Parlamentares` path.
    pub async fn fetch_senators(&self) -> Result<Vec<Politician>, SourceError> {
        let url = self.http.build_url("senador/lista/atual.json", &[])?;
        let response: SenadoListResponse = self.http.get_json(&url).await?;

        let entries = response.lista.parlamentares.parlamentar.into_vec();
        let total = entries.len();
        let senators: Vec<Politician> = entries.iter().filter_map(normalize_senator).collect();
        tracing::debug!(
            count = senators.len(),
            skipped = total - senators.len(),
            "senado: fetched senators"
        );
        Ok(dedupe_by_id(senators))
    }
}
