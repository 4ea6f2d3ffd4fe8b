//! Search backend trait and the DuckDuckGo HTML client.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, SearchError};

// ─────────────────────────────────────────────────────────────────────────────
// Search Result
// ─────────────────────────────────────────────────────────────────────────────

/// A single web search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Snippet text.
    pub body: String,
    /// Result URL.
    pub url: String,
}

impl SearchResult {
    /// Create a new result.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: url.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for web search providers.
///
/// Callers must tolerate an empty result list; a failed upstream search is
/// equivalent to no results from the workflow's point of view.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search and return results, best first.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;

    /// Get the name of this backend.
    fn name(&self) -> &str;
}

/// A search backend that can be shared across threads.
pub type SharedSearch = Arc<dyn SearchBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// DuckDuckGo Client
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the DuckDuckGo HTML client.
#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum number of results to return.
    pub max_results: usize,
    /// User agent string.
    pub user_agent: String,
    /// Maximum snippet length per result.
    pub max_snippet_length: usize,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_results: 5,
            user_agent: concat!("Strix/", env!("CARGO_PKG_VERSION"), " (Chat Agent)").to_string(),
            max_snippet_length: 1_000,
        }
    }
}

/// Search client scraping the DuckDuckGo HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoClient {
    client: Client,
    config: DuckDuckGoConfig,
}

impl DuckDuckGoClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(DuckDuckGoConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: DuckDuckGoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Parse the result list out of a DuckDuckGo HTML page.
    fn parse_results(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);

        // Selectors are static and known-valid.
        let result_selector = Selector::parse("div.result").expect("valid selector");
        let title_selector = Selector::parse("a.result__a").expect("valid selector");
        let snippet_selector = Selector::parse(".result__snippet").expect("valid selector");

        let mut results = Vec::new();

        for element in document.select(&result_selector) {
            let Some(anchor) = element.select(&title_selector).next() else {
                continue;
            };

            let title = anchor.text().collect::<Vec<_>>().join(" ");
            let href = anchor.value().attr("href").unwrap_or_default();
            let url = Self::resolve_redirect(href);

            let mut body = element
                .select(&snippet_selector)
                .next()
                .map(|s| s.text().collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            body = body.split_whitespace().collect::<Vec<_>>().join(" ");
            if body.len() > self.config.max_snippet_length {
                body.truncate(self.config.max_snippet_length);
            }

            if title.trim().is_empty() {
                continue;
            }

            results.push(SearchResult::new(title.trim(), body, url));

            if results.len() >= self.config.max_results {
                break;
            }
        }

        results
    }

    /// DuckDuckGo wraps result links in a redirect; unwrap the `uddg` param.
    fn resolve_redirect(href: &str) -> String {
        if let Ok(url) = url::Url::parse(&format!("https://duckduckgo.com{href}")) {
            for (key, value) in url.query_pairs() {
                if key == "uddg" {
                    return value.into_owned();
                }
            }
        }
        href.to_string()
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let endpoint = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        tracing::debug!(query, "Running web search");

        let response = self.client.get(&endpoint).send().await?;
        let html = response.text().await?;
        let results = self.parse_results(&html);

        tracing::debug!(query, count = results.len(), "Search complete");

        Ok(results)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Search
// ─────────────────────────────────────────────────────────────────────────────

/// A mock search backend for testing.
///
/// Returns a fixed result list, or fails every call when constructed with
/// [`MockSearch::failing`].
#[derive(Debug)]
pub struct MockSearch {
    results: Vec<SearchResult>,
    fail_with: Option<String>,
    query_log: std::sync::Mutex<Vec<String>>,
}

impl MockSearch {
    /// Create a mock that returns the given results for every query.
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            fail_with: None,
            query_log: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns no results.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Create a mock that fails every search with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            fail_with: Some(message.into()),
            query_log: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get the queries that were issued.
    pub fn queries(&self) -> Vec<String> {
        self.query_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.query_log.lock().unwrap().push(query.to_string());
        if let Some(message) = &self.fail_with {
            return Err(SearchError::parse(message.clone()));
        }
        Ok(self.results.clone())
    }

    fn name(&self) -> &str {
        "mock-search"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="/l/?uddg=https%3A%2F%2Fexample.com%2Fgold">Gold price today</a>
            <a class="result__snippet">Spot gold rose to a new high.</a>
          </div>
          <div class="result">
            <a class="result__a" href="/l/?uddg=https%3A%2F%2Fexample.org%2Fmarkets">Markets update</a>
            <a class="result__snippet">Commodities were mixed in early trading.</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_results_extracts_title_body_url() {
        let client = DuckDuckGoClient::new().unwrap();
        let results = client.parse_results(SAMPLE_PAGE);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Gold price today");
        assert_eq!(results[0].url, "https://example.com/gold");
        assert!(results[0].body.contains("Spot gold"));
    }

    #[test]
    fn test_parse_results_respects_max_results() {
        let config = DuckDuckGoConfig {
            max_results: 1,
            ..Default::default()
        };
        let client = DuckDuckGoClient::with_config(config).unwrap();
        let results = client.parse_results(SAMPLE_PAGE);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_parse_results_empty_page() {
        let client = DuckDuckGoClient::new().unwrap();
        let results = client.parse_results("<html><body></body></html>");
        assert!(results.is_empty());
    }

    #[test]
    fn test_resolve_redirect_unwraps_uddg() {
        let url = DuckDuckGoClient::resolve_redirect("/l/?uddg=https%3A%2F%2Fexample.com%2Fpage");
        assert_eq!(url, "https://example.com/page");
    }

    #[tokio::test]
    async fn test_mock_search_returns_results() {
        let mock = MockSearch::new(vec![SearchResult::new("t", "b", "https://u")]);
        let results = mock.search("anything").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(mock.queries(), vec!["anything"]);
    }

    #[tokio::test]
    async fn test_mock_search_failing() {
        let mock = MockSearch::failing("upstream down");
        assert!(mock.search("q").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_search_empty() {
        let mock = MockSearch::empty();
        assert!(mock.search("q").await.unwrap().is_empty());
    }
}
