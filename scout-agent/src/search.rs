//! Web search client
//!
//! Wraps the Tavily search API behind the [`SearchProvider`] trait. The HTTP
//! handle is built lazily on the first call and reused for the lifetime of
//! the client.

use crate::types::{AgentError, AgentResult, SearchResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

/// A web-search provider returning a bounded list of ranked results
///
/// Implementations perform exactly one provider invocation per call and do
/// not retry; retry and fallback policy lives above this layer, and only for
/// the summarization stage.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web, returning at most `limit` results in provider order
    /// together with the raw provider payload.
    async fn search(&self, query: &str, limit: usize) -> AgentResult<(Vec<SearchResult>, Value)>;
}

/// Constructs search providers, one per pipeline run
pub trait SearchFactory: Send + Sync {
    fn create(&self) -> AgentResult<Box<dyn SearchProvider>>;
}

/// Search client backed by the Tavily REST API
pub struct TavilySearchClient {
    api_key: String,
    endpoint: String,
    http: OnceCell<reqwest::Client>,
}

impl TavilySearchClient {
    /// Create a client from an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: TAVILY_ENDPOINT.to_string(),
            http: OnceCell::new(),
        }
    }

    /// Create a client from the `TAVILY_API_KEY` environment variable
    pub fn from_env() -> AgentResult<Self> {
        let api_key = std::env::var("TAVILY_API_KEY")
            .map_err(|_| AgentError::Config("TAVILY_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    async fn http_client(&self) -> AgentResult<&reqwest::Client> {
        self.http
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .user_agent(concat!("scout/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| {
                        AgentError::Search(format!("Failed to build HTTP client: {}", e))
                    })
            })
            .await
    }
}

/// Map a raw provider payload to ranked results, truncated to `limit`
///
/// Missing fields degrade instead of failing: absent title becomes
/// `"No title"`, absent snippet falls back to the `content` field and then
/// to an empty string.
pub fn parse_provider_results(raw: &Value, limit: usize) -> Vec<SearchResult> {
    raw.get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(limit)
                .map(|item| SearchResult {
                    title: item
                        .get("title")
                        .and_then(Value::as_str)
                        .unwrap_or("No title")
                        .to_string(),
                    url: item
                        .get("url")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    snippet: item
                        .get("snippet")
                        .and_then(Value::as_str)
                        .or_else(|| item.get("content").and_then(Value::as_str))
                        .unwrap_or("")
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl SearchProvider for TavilySearchClient {
    async fn search(&self, query: &str, limit: usize) -> AgentResult<(Vec<SearchResult>, Value)> {
        let client = self.http_client().await?;
        let body = json!({ "query": query, "max_results": limit as u32 });

        debug!("Searching for: {}", query);
        let start = Instant::now();

        let response = client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Search(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Search(format!(
                "Search provider returned {}: {}",
                status, detail
            )));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| AgentError::Search(format!("Malformed search response: {}", e)))?;

        let results = parse_provider_results(&raw, limit);
        info!(
            "Search returned {} results in {:?}",
            results.len(),
            start.elapsed()
        );

        Ok((results, raw))
    }
}

/// Default factory creating Tavily clients from the environment
pub struct TavilySearchFactory;

impl SearchFactory for TavilySearchFactory {
    fn create(&self) -> AgentResult<Box<dyn SearchProvider>> {
        Ok(Box::new(TavilySearchClient::from_env()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncates_to_limit_preserving_provider_order() {
        let raw = json!({
            "results": [
                {"title": "first", "url": "http://1", "content": "c1"},
                {"title": "second", "url": "http://2", "content": "c2"},
                {"title": "third", "url": "http://3", "content": "c3"},
            ]
        });

        let results = parse_provider_results(&raw, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "first");
        assert_eq!(results[1].title, "second");
    }

    #[test]
    fn maps_missing_fields_defensively() {
        let raw = json!({
            "results": [
                {"url": "http://no-title", "content": "body"},
                {"title": "no snippet at all", "url": "http://bare"},
                {"title": "snippet wins", "url": "http://s", "snippet": "s", "content": "c"},
            ]
        });

        let results = parse_provider_results(&raw, 5);
        assert_eq!(results[0].title, "No title");
        assert_eq!(results[0].snippet, "body");
        assert_eq!(results[1].snippet, "");
        assert_eq!(results[2].snippet, "s");
    }

    #[test]
    fn payload_without_results_is_empty() {
        assert!(parse_provider_results(&json!({}), 5).is_empty());
        assert!(parse_provider_results(&json!({"results": "oops"}), 5).is_empty());
    }
}
