use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{ErrorBody, SearchResult, SearchTransport};
use crate::config::BackendConfig;
use crate::error::{Result, SearchUiError};
use crate::query::SearchQuery;

/// reqwest-backed search client
pub struct HttpSearchClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpSearchClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint: config.search_url()?,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SearchTransport for HttpSearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        debug!("Sending search request to {}: {:?}", self.endpoint, query);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_response(status, &body)
    }
}

/// Turn a status code and raw body into results or a failure.
///
/// Any non-2xx status fails. A non-blank `error` field from the server is
/// preferred as the message, otherwise the status code is reported.
pub fn interpret_response(status: u16, body: &str) -> Result<Vec<SearchResult>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        return Err(SearchUiError::Http { status, message });
    }

    // A `null` body renders as an empty result set
    let results: Option<Vec<SearchResult>> = serde_json::from_str(body)?;
    Ok(results.unwrap_or_default())
}
