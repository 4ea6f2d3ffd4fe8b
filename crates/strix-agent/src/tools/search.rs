//! Web search tool backed by a [`SearchBackend`].

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use strix_search::{SearchBackend, SharedSearch};

use crate::classify::contains_recency_indicator;
use crate::tool::Tool;
use crate::types::{ToolRequest, ToolResult, ToolType};

/// Retrieves external information through a search backend.
pub struct SearchTool {
    backend: SharedSearch,
}

impl SearchTool {
    pub const NAME: &'static str = "web_search";

    /// Default result cap when the request does not specify one.
    const DEFAULT_MAX_RESULTS: usize = 5;

    pub fn new(backend: SharedSearch) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Search
    }

    fn can_handle(&self, request: &ToolRequest) -> f64 {
        if request.tool_type != ToolType::Search {
            return 0.0;
        }
        let query = request
            .input_data
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if query.is_empty() {
            return 0.1;
        }
        if contains_recency_indicator(query) {
            0.95
        } else {
            0.7
        }
    }

    async fn execute(&self, input: &Value) -> ToolResult {
        let start = Instant::now();
        let query = input
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let max_results = input
            .get("max_results")
            .and_then(Value::as_u64)
            .unwrap_or(Self::DEFAULT_MAX_RESULTS as u64) as usize;

        match self.backend.search(query).await {
            Ok(results) => {
                let results: Vec<_> = results.into_iter().take(max_results).collect();
                let elapsed = start.elapsed().as_secs_f64();
                let confidence = if results.is_empty() { 0.3 } else { 0.9 };
                tracing::debug!(query, found = results.len(), "search tool completed");

                let payload = json!({
                    "query": query,
                    "results": results,
                    "results_found": results.len(),
                });
                ToolResult::success(Self::NAME, ToolType::Search, payload, elapsed, confidence)
                    .with_metadata(json!({
                        "query": query,
                        "backend": self.backend.name(),
                    }))
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "search tool failed");
                ToolResult::failure(
                    Self::NAME,
                    ToolType::Search,
                    start.elapsed().as_secs_f64(),
                    err.to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strix_search::{MockSearch, SearchResult};

    fn tool_with_results() -> SearchTool {
        SearchTool::new(Arc::new(MockSearch::new(vec![
            SearchResult::new("Rust", "A systems language", "https://rust-lang.org"),
            SearchResult::new("Tokio", "Async runtime", "https://tokio.rs"),
        ])))
    }

    #[test]
    fn test_can_handle_scores() {
        let tool = tool_with_results();

        let wrong_type = ToolRequest::new(ToolType::Analysis, json!({"query": "latest news"}));
        assert_eq!(tool.can_handle(&wrong_type), 0.0);

        let empty = ToolRequest::new(ToolType::Search, json!({"query": ""}));
        assert!((tool.can_handle(&empty) - 0.1).abs() < 1e-9);

        let recency = ToolRequest::new(ToolType::Search, json!({"query": "latest rust release"}));
        assert!((tool.can_handle(&recency) - 0.95).abs() < 1e-9);

        let plain = ToolRequest::new(ToolType::Search, json!({"query": "rust ownership"}));
        assert!((tool.can_handle(&plain) - 0.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_execute_with_results() {
        let tool = tool_with_results();
        let result = tool.execute(&json!({"query": "rust"})).await;

        assert!(result.success);
        assert!((result.confidence - 0.9).abs() < 1e-9);
        assert_eq!(result.payload["results_found"], 2);
        assert_eq!(result.tool_name, "web_search");
    }

    #[tokio::test]
    async fn test_execute_empty_results_lowers_confidence() {
        let tool = SearchTool::new(Arc::new(MockSearch::empty()));
        let result = tool.execute(&json!({"query": "anything"})).await;

        assert!(result.success);
        assert!((result.confidence - 0.3).abs() < 1e-9);
        assert_eq!(result.payload["results_found"], 0);
    }

    #[tokio::test]
    async fn test_execute_backend_failure_is_data() {
        let tool = SearchTool::new(Arc::new(MockSearch::failing("offline")));
        let result = tool.execute(&json!({"query": "anything"})).await;

        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_execute_respects_max_results() {
        let tool = tool_with_results();
        let result = tool.execute(&json!({"query": "rust", "max_results": 1})).await;
        assert_eq!(result.payload["results_found"], 1);
    }
}
