//! Search engine delegate
//!
//! Forwards order searches to a Manticore-compatible JSON API. Every
//! outcome, including upstream failure, is returned as a [`SearchResult`].

use serde::Deserialize;
use serde_json::{Value, json};
use shared::models::SearchResult;

use crate::config::SearchConfig;

/// Client for the search engine's `/json/search` endpoint
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    index: String,
    default_limit: u32,
}

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    #[serde(default)]
    hits: Option<RawHits>,
    #[serde(default)]
    warning: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHits {
    #[serde(default)]
    hits: Vec<Value>,
    #[serde(default)]
    total: u64,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/json/search", config.base_url.trim_end_matches('/')),
            index: config.index.clone(),
            default_limit: config.default_limit,
        })
    }

    /// Request body for a query; a blank query matches everything
    pub fn request_body(&self, query: &str, limit: u32) -> Value {
        let query = if query.trim().is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "match": { "name": query } })
        };
        json!({
            "index": self.index,
            "query": query,
            "limit": limit,
        })
    }

    pub async fn search_orders(&self, query: &str, limit: Option<u32>) -> SearchResult {
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.default_limit);
        let body = self.request_body(query, limit);

        let response = match self.http.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, endpoint = %self.endpoint, "Search request failed");
                return SearchResult::failed(format!("Network error: {e}"));
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Search engine returned non-200");
            return SearchResult::failed(format!(
                "Search engine returned status code: {}",
                status.as_u16()
            ));
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Search response body unreadable");
                return SearchResult::failed(format!("Network error: {e}"));
            }
        };

        match serde_json::from_slice::<RawResponse>(&bytes) {
            Ok(raw) => {
                let hits = raw.hits.unwrap_or_default();
                SearchResult::found(hits.hits, hits.total, raw.warning)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Search response undecodable");
                SearchResult::failed(format!("An unexpected error occurred: {e}"))
            }
        }
    }
}
