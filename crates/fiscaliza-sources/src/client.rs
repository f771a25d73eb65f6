//! Shared HTTP plumbing for the legislature connectors.
//!
//! Both chambers expose plain JSON over GET. [`JsonClient`] owns the
//! `reqwest` client and the normalised base URL, builds request URLs with
//! percent-encoded query parameters, maps non-2xx statuses to
//! [`SourceError::Status`], and retries transient failures.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::retry::retry_with_backoff;

/// HTTP settings shared by both connectors.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "fiscaliza/0.1 (civic-transparency)".to_string(),
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn from_app_config(config: &fiscaliza_core::AppConfig) -> Self {
        Self {
            timeout_secs: config.source_timeout_secs,
            user_agent: config.source_user_agent.clone(),
            max_retries: config.source_max_retries,
            retry_backoff_ms: config.source_retry_backoff_ms,
        }
    }
}

pub(crate) struct JsonClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl JsonClient {
    pub(crate) fn new(config: &SourceConfig, base_url: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;

        // Exactly one trailing slash so relative joins append path segments
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SourceError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Builds `<base>/<path>?<query>` with percent-encoded query values.
    pub(crate) fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SourceError::InvalidBaseUrl(format!("join '{path}': {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// GETs `url` with retries and deserializes the body as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, SourceError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_ms, || {
            self.get_json_once(url)
        })
        .await
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> JsonClient {
        JsonClient::new(&SourceConfig::default(), base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_path_under_base() {
        let client = test_client("https://dadosabertos.camara.leg.br/api/v2");
        let url = client
            .build_url("deputados", &[("itens", "513")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://dadosabertos.camara.leg.br/api/v2/deputados?itens=513"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_and_leading_slashes() {
        let client = test_client("https://dadosabertos.camara.leg.br/api/v2/");
        let url = client
            .build_url("/deputados/204554/despesas", &[("ano", "2025")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://dadosabertos.camara.leg.br/api/v2/deputados/204554/despesas?ano=2025"
        );
    }

    #[test]
    fn build_url_without_query_has_no_question_mark() {
        let client = test_client("https://legis.senado.leg.br/dadosabertos");
        let url = client.build_url("senador/lista/atual.json", &[]).expect("url");
        assert_eq!(
            url.as_str(),
            "https://legis.senado.leg.br/dadosabertos/senador/lista/atual.json"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = JsonClient::new(&SourceConfig::default(), "not a url");
        assert!(matches!(result, Err(SourceError::InvalidBaseUrl(_))));
    }
}
