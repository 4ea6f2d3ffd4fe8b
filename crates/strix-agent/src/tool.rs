//! The [`Tool`] trait and the registry the orchestrator selects from.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{ToolRequest, ToolResult, ToolType};

/// A capability the orchestrator can plan and execute.
///
/// Tools are infallible at the signature level: `execute` always returns a
/// [`ToolResult`]. An execution failure is encoded in the result
/// (`success = false`, `confidence = 0.0`, `error` set) so the orchestrator
/// can aggregate partial outcomes without short-circuiting.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name used in plans, dependencies, and statistics.
    fn name(&self) -> &str;

    /// The capability category this tool belongs to.
    fn tool_type(&self) -> ToolType;

    /// Self-assessed fitness for the request, in `[0.0, 1.0]`.
    ///
    /// Must return `0.0` for requests of a different [`ToolType`].
    fn can_handle(&self, request: &ToolRequest) -> f64;

    /// Run the tool against the request's input payload.
    async fn execute(&self, input: &Value) -> ToolResult;
}

/// Shared handle to a tool.
pub type SharedTool = Arc<dyn Tool>;

/// Registry of available tools, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, SharedTool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name is replaced.
    pub fn register(&mut self, tool: SharedTool) {
        tracing::debug!(tool = tool.name(), "registering tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&SharedTool> {
        self.tools.get(name)
    }

    /// All registered tools.
    pub fn iter(&self) -> impl Iterator<Item = &SharedTool> {
        self.tools.values()
    }

    /// Registered tool names, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Scriptable tool for orchestrator tests.
#[cfg(test)]
pub(crate) struct MockTool {
    name: String,
    tool_type: ToolType,
    score: f64,
    confidence: f64,
    fail_with: Option<String>,
    pub calls: parking_lot::Mutex<Vec<Value>>,
}

#[cfg(test)]
impl MockTool {
    pub fn new(name: impl Into<String>, tool_type: ToolType) -> Self {
        Self {
            name: name.into(),
            tool_type,
            score: 0.9,
            confidence: 0.9,
            fail_with: None,
            calls: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn failing(mut self, error: impl Into<String>) -> Self {
        self.fail_with = Some(error.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(test)]
#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn tool_type(&self) -> ToolType {
        self.tool_type
    }

    fn can_handle(&self, request: &ToolRequest) -> f64 {
        if request.tool_type != self.tool_type {
            return 0.0;
        }
        self.score
    }

    async fn execute(&self, input: &Value) -> ToolResult {
        self.calls.lock().push(input.clone());
        match &self.fail_with {
            Some(error) => ToolResult::failure(&self.name, self.tool_type, 0.01, error.clone()),
            None => ToolResult::success(
                &self.name,
                self.tool_type,
                serde_json::json!({"mock": true}),
                0.01,
                self.confidence,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(MockTool::new("alpha", ToolType::Search)));
        registry.register(Arc::new(MockTool::new("beta", ToolType::Analysis)));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_registry_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("t", ToolType::Search)));
        registry.register(Arc::new(
            MockTool::new("t", ToolType::Search).with_score(0.2),
        ));
        assert_eq!(registry.len(), 1);

        let request = ToolRequest::new(ToolType::Search, json!({}));
        let score = registry.get("t").unwrap().can_handle(&request);
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_mock_tool_rejects_other_types() {
        let tool = MockTool::new("t", ToolType::Synthesis);
        let request = ToolRequest::new(ToolType::Search, json!({}));
        assert_eq!(tool.can_handle(&request), 0.0);
    }

    #[tokio::test]
    async fn test_mock_tool_failure_is_data() {
        let tool = MockTool::new("t", ToolType::Validation).failing("offline");
        let result = tool.execute(&json!({})).await;
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.error.as_deref(), Some("offline"));
        assert_eq!(tool.call_count(), 1);
    }
}
