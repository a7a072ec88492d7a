//! Perplexity web search client.

use crate::config::SearchSettings;
use crate::error::{PdfChatError, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

pub const NO_ANSWER: &str = "No answer found";
pub const RETRIEVAL_ERROR: &str = "Error retrieving data";

/// Answer returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchAnswer {
    pub answer: String,
}

/// Client for a Perplexity-style `GET /search?q=` endpoint.
pub struct WebSearch {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl WebSearch {
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| PdfChatError::Config(format!("Invalid search endpoint {}: {}", endpoint, e)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Build a client from settings, reading the key from the configured variable.
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).unwrap_or_else(|_| {
            warn!("{} is not set, searching without a key", settings.api_key_env);
            String::new()
        });
        Self::new(&settings.endpoint, api_key)
    }

    /// Full request URL for a query.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    /// Run a search. HTTP failures are reported in the answer text.
    pub async fn search(&self, query: &str) -> Result<SearchAnswer> {
        let url = self.request_url(query);
        debug!("Searching {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Error retrieving data: {} - {}", status.as_u16(), body);
            return Ok(SearchAnswer {
                answer: RETRIEVAL_ERROR.to_string(),
            });
        }

        parse_answer(&body)
    }
}

/// Pull the `answer` field out of a successful response body.
fn parse_answer(body: &str) -> Result<SearchAnswer> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PdfChatError::Search(format!("Invalid response body: {}", e)))?;
    let answer = value
        .get("answer")
        .and_then(|a| a.as_str())
        .unwrap_or(NO_ANSWER)
        .to_string();
    Ok(SearchAnswer { answer })
}
