//! Multi-tool orchestration: planning, selection, dependency-ordered
//! execution, aggregation, and meta-validation.
//!
//! The orchestrator owns its [`ToolRegistry`] and the only cross-run
//! mutable state in the crate: a bounded execution history and rolling
//! per-tool performance stats, both behind one `parking_lot::Mutex`.

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Instant;
use uuid::Uuid;

use crate::classify::contains_recency_indicator;
use crate::error::{AgentError, Result};
use crate::tool::{SharedTool, ToolRegistry};
use crate::types::{
    OrchestrationResult, OrchestrationSummary, QualityValidation, ToolContribution, ToolPriority,
    ToolRequest, ToolResult, ToolStats, ToolSynthesis, ToolType,
};

/// Queries longer than this get an analysis pass.
const ANALYSIS_LENGTH_THRESHOLD: usize = 20;

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum workflow records kept for statistics.
    pub history_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

/// Caller-supplied context for one orchestration run.
#[derive(Debug, Clone, Default)]
pub struct OrchestrationContext {
    /// Pre-gathered information sources, each a `{content, type}` object.
    pub sources: Vec<Value>,
}

impl OrchestrationContext {
    pub fn with_sources(sources: Vec<Value>) -> Self {
        Self { sources }
    }
}

/// One line of execution history, kept for statistics only.
#[derive(Debug, Clone)]
struct WorkflowRecord {
    tools_used: Vec<String>,
    execution_secs: f64,
    success: bool,
}

#[derive(Default)]
struct OrchestratorState {
    history: VecDeque<WorkflowRecord>,
    stats: HashMap<String, ToolStats>,
}

/// Coordinates tool planning, selection, and execution for one query.
pub struct Orchestrator {
    registry: ToolRegistry,
    config: OrchestratorConfig,
    state: Mutex<OrchestratorState>,
}

impl Orchestrator {
    /// Create an orchestrator over the given registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_config(registry, OrchestratorConfig::default())
    }

    pub fn with_config(registry: ToolRegistry, config: OrchestratorConfig) -> Self {
        Self {
            registry,
            config,
            state: Mutex::new(OrchestratorState::default()),
        }
    }

    /// The registered tool names.
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Run the full orchestration for a query.
    ///
    /// Individual tool failures never abort the run; they are recorded in
    /// the breakdown and excluded from aggregation weighting.
    pub async fn orchestrate(
        &self,
        user_query: &str,
        context: &OrchestrationContext,
    ) -> OrchestrationResult {
        let start = Instant::now();
        let workflow_id = format!("workflow_{}", Uuid::new_v4().simple());

        if self.registry.is_empty() {
            tracing::warn!(workflow_id, "orchestration requested with no tools registered");
            return OrchestrationResult {
                success: false,
                workflow_id,
                tools_orchestrated: 0,
                execution_secs: start.elapsed().as_secs_f64(),
                synthesis: ToolSynthesis::empty(),
                quality_validation: QualityValidation::unavailable(),
                tool_breakdown: BTreeMap::new(),
                error: Some("no tools registered".to_string()),
            };
        }

        let plan = self.plan(user_query, context);
        tracing::debug!(workflow_id, planned = plan.len(), "tool plan built");

        let results = self.execute_plan(&plan).await;
        let synthesis = Self::aggregate(&results);
        let quality_validation = self.meta_validate(&synthesis).await;
        let execution_secs = start.elapsed().as_secs_f64();

        self.record(&results, execution_secs, true);
        tracing::info!(
            workflow_id,
            tools = results.len(),
            confidence = synthesis.confidence_assessment,
            "orchestration completed"
        );

        OrchestrationResult {
            success: true,
            workflow_id,
            tools_orchestrated: results.len(),
            execution_secs,
            synthesis,
            quality_validation,
            tool_breakdown: results,
            error: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Planning
    // ─────────────────────────────────────────────────────────────────────

    /// Build the ordered tool plan for a query.
    ///
    /// Deterministic for a fixed query, context, and stats snapshot.
    pub fn plan(&self, user_query: &str, context: &OrchestrationContext) -> Vec<ToolRequest> {
        let mut plan: Vec<ToolRequest> = Vec::new();

        if user_query.len() > ANALYSIS_LENGTH_THRESHOLD {
            plan.push(
                ToolRequest::new(
                    ToolType::Analysis,
                    json!({"content": user_query, "type": "detailed"}),
                )
                .with_priority(ToolPriority::High),
            );
        }

        if contains_recency_indicator(user_query) {
            let dependencies = self.planned_tool_names(&plan, &[ToolType::Analysis]);
            plan.push(
                ToolRequest::new(
                    ToolType::Search,
                    json!({"query": user_query, "max_results": 5}),
                )
                .with_priority(ToolPriority::High)
                .with_dependencies(dependencies),
            );
        }

        if plan.len() > 1 || !context.sources.is_empty() {
            let dependencies =
                self.planned_tool_names(&plan, &[ToolType::Search, ToolType::Analysis]);
            plan.push(
                ToolRequest::new(
                    ToolType::Synthesis,
                    json!({
                        "sources": context.sources,
                        "context": user_query,
                        "type": "comprehensive",
                    }),
                )
                .with_dependencies(dependencies),
            );
        }

        let dependencies = self.planned_tool_names(&plan, &[ToolType::Synthesis]);
        plan.push(
            ToolRequest::new(
                ToolType::Validation,
                json!({"content": user_query, "type": "comprehensive"}),
            )
            .with_dependencies(dependencies),
        );

        plan
    }

    /// Resolve planned requests of the given types to the tool names that
    /// selection would pick for them.
    fn planned_tool_names(&self, plan: &[ToolRequest], types: &[ToolType]) -> Vec<String> {
        plan.iter()
            .filter(|request| types.contains(&request.tool_type))
            .filter_map(|request| self.select_tool(request))
            .map(|tool| tool.name().to_string())
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection & Execution
    // ─────────────────────────────────────────────────────────────────────

    /// Pick the best tool for a request: highest `can_handle` score plus a
    /// small bonus from its rolling success rate. `None` when nothing
    /// scores above zero.
    fn select_tool(&self, request: &ToolRequest) -> Option<SharedTool> {
        let state = self.state.lock();
        let mut best: Option<SharedTool> = None;
        let mut best_score = 0.0;

        for tool in self.registry.iter() {
            let success_rate = state
                .stats
                .get(tool.name())
                .map(|s| s.success_rate)
                .unwrap_or(0.0);
            let score = tool.can_handle(request) + success_rate * 0.1;
            if score > best_score {
                best_score = score;
                best = Some(tool.clone());
            }
        }

        best
    }

    /// Execute the plan with dependency ordering.
    ///
    /// Requests run only after every named dependency has completed. Each
    /// request is attempted exactly once; a request whose dependencies can
    /// never be satisfied (its dependency was skipped or failed to select)
    /// is attempted anyway in plan order rather than deadlocking.
    async fn execute_plan(&self, plan: &[ToolRequest]) -> BTreeMap<String, ToolResult> {
        let mut results = BTreeMap::new();
        let mut completed: HashSet<String> = HashSet::new();
        let mut attempted = vec![false; plan.len()];

        loop {
            let mut progressed = false;

            for (i, request) in plan.iter().enumerate() {
                if attempted[i] {
                    continue;
                }
                if !request
                    .dependencies
                    .iter()
                    .all(|dep| completed.contains(dep))
                {
                    continue;
                }
                attempted[i] = true;
                progressed = true;
                self.run_request(request, &mut completed, &mut results).await;
            }

            if attempted.iter().all(|done| *done) {
                break;
            }
            if !progressed {
                tracing::warn!("plan has unsatisfiable dependencies, executing remainder in order");
                for (i, request) in plan.iter().enumerate() {
                    if !attempted[i] {
                        attempted[i] = true;
                        self.run_request(request, &mut completed, &mut results).await;
                    }
                }
                break;
            }
        }

        results
    }

    async fn run_request(
        &self,
        request: &ToolRequest,
        completed: &mut HashSet<String>,
        results: &mut BTreeMap<String, ToolResult>,
    ) {
        match self.select_tool(request) {
            Some(tool) => {
                let result = tool.execute(&request.input_data).await;
                tracing::info!(
                    tool = tool.name(),
                    success = result.success,
                    confidence = result.confidence,
                    "executed tool"
                );
                completed.insert(tool.name().to_string());
                results.insert(tool.name().to_string(), result);
            }
            None => {
                tracing::debug!(tool_type = %request.tool_type, "no tool scored above zero, skipping request");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Aggregation
    // ─────────────────────────────────────────────────────────────────────

    fn aggregate(results: &BTreeMap<String, ToolResult>) -> ToolSynthesis {
        let tools_executed = results.len();
        let successful: Vec<&ToolResult> = results.values().filter(|r| r.success).collect();

        let summary = OrchestrationSummary {
            tools_executed,
            successful_tools: successful.len(),
            total_execution_secs: results.values().map(|r| r.execution_secs).sum(),
            average_confidence: if tools_executed == 0 {
                0.0
            } else {
                results.values().map(|r| r.confidence).sum::<f64>() / tools_executed as f64
            },
        };

        let mut tool_contributions = BTreeMap::new();
        for (name, result) in results {
            if result.success {
                tool_contributions.insert(
                    name.clone(),
                    ToolContribution {
                        tool_type: result.tool_type,
                        confidence: result.confidence,
                        execution_secs: result.execution_secs,
                        key_findings: Self::extract_key_findings(&result.payload),
                        metadata: result.metadata.clone(),
                    },
                );
            }
        }

        ToolSynthesis {
            summary,
            tool_contributions,
            integrated_insights: Self::integrated_insights(results),
            confidence_assessment: Self::overall_confidence(results),
        }
    }

    /// Up to three findings pulled from a tool payload: scalar fields and
    /// the first items of non-empty arrays.
    fn extract_key_findings(payload: &Value) -> Vec<String> {
        let mut findings = Vec::new();

        match payload {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::String(s) => findings.push(format!("{key}: {s}")),
                        Value::Number(n) => findings.push(format!("{key}: {n}")),
                        Value::Bool(b) => findings.push(format!("{key}: {b}")),
                        Value::Array(items) if !items.is_empty() => {
                            let head: Vec<String> = items
                                .iter()
                                .take(3)
                                .map(|item| match item {
                                    Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect();
                            findings.push(format!("{key}: {}", head.join(", ")));
                        }
                        _ => {}
                    }
                }
            }
            Value::String(text) => {
                let finding = match text.split_once('.') {
                    Some((sentence, _)) => sentence.to_string(),
                    None => text.chars().take(100).collect(),
                };
                findings.push(finding.trim().to_string());
            }
            _ => {}
        }

        findings.truncate(3);
        findings
    }

    fn integrated_insights(results: &BTreeMap<String, ToolResult>) -> Vec<String> {
        let mut insights = Vec::new();

        let has_search = results
            .values()
            .any(|r| r.success && r.tool_type == ToolType::Search);
        let has_analysis = results
            .values()
            .any(|r| r.success && r.tool_type == ToolType::Analysis);

        if has_search && has_analysis {
            insights
                .push("Combined search and analysis data for comprehensive understanding".to_string());
        }
        if results.len() >= 3 {
            insights.push(
                "Multi-tool orchestration provided enhanced accuracy through validation".to_string(),
            );
        }

        if !results.is_empty() {
            let successful_confidence: f64 = results
                .values()
                .filter(|r| r.success)
                .map(|r| r.confidence)
                .sum();
            let avg_confidence = successful_confidence / results.len() as f64;
            if avg_confidence > 0.8 {
                insights.push("High confidence in results due to strong tool performance".to_string());
            } else if avg_confidence < 0.6 {
                insights.push(
                    "Moderate confidence - additional verification may be beneficial".to_string(),
                );
            }
        }

        insights
    }

    /// Weighted mean confidence over successful tools, renormalized over
    /// the weights of the tools that actually succeeded.
    fn overall_confidence(results: &BTreeMap<String, ToolResult>) -> f64 {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for result in results.values().filter(|r| r.success) {
            let weight = result.tool_type.confidence_weight();
            weighted_sum += result.confidence * weight;
            total_weight += weight;
        }

        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Meta-validation
    // ─────────────────────────────────────────────────────────────────────

    /// Run the registered validation tool against the serialized synthesis.
    async fn meta_validate(&self, synthesis: &ToolSynthesis) -> QualityValidation {
        let Some(validation_tool) = self
            .registry
            .iter()
            .find(|tool| tool.tool_type() == ToolType::Validation)
        else {
            return QualityValidation::unavailable();
        };

        let content = serde_json::to_string_pretty(synthesis).unwrap_or_default();
        let result = validation_tool
            .execute(&json!({"content": content, "type": "comprehensive"}))
            .await;

        let quality_score = if result.success {
            result
                .payload
                .get("quality_score")
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        } else {
            0.0
        };
        let recommendations = if result.success {
            result
                .payload
                .get("recommendations")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        QualityValidation {
            available: true,
            success: result.success,
            quality_score,
            validation_confidence: result.confidence,
            recommendations,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // History & Statistics
    // ─────────────────────────────────────────────────────────────────────

    fn record(&self, results: &BTreeMap<String, ToolResult>, execution_secs: f64, success: bool) {
        let mut state = self.state.lock();

        state.history.push_back(WorkflowRecord {
            tools_used: results.keys().cloned().collect(),
            execution_secs,
            success,
        });
        while state.history.len() > self.config.history_limit {
            state.history.pop_front();
        }

        for (name, result) in results {
            state.stats.entry(name.clone()).or_default().record(result);
        }
    }

    /// Rolling stats for a registered tool. Zeroed until it has executed.
    pub fn tool_stats(&self, tool_name: &str) -> Result<ToolStats> {
        if self.registry.get(tool_name).is_none() {
            return Err(AgentError::ToolNotFound(tool_name.to_string()));
        }
        Ok(self
            .state
            .lock()
            .stats
            .get(tool_name)
            .cloned()
            .unwrap_or_default())
    }

    /// Aggregate statistics across all recorded runs.
    pub fn statistics(&self) -> Value {
        let state = self.state.lock();
        let total = state.history.len();
        let successful = state.history.iter().filter(|w| w.success).count();
        let average_time = if total == 0 {
            0.0
        } else {
            state.history.iter().map(|w| w.execution_secs).sum::<f64>() / total as f64
        };

        let mut tool_performance = Map::new();
        for (name, stats) in &state.stats {
            tool_performance.insert(name.clone(), json!(stats));
        }

        json!({
            "total_workflows": total,
            "successful_workflows": successful,
            "average_workflow_secs": average_time,
            "tools_available": self.registry.len(),
            "tool_performance": tool_performance,
            "most_used_tools": Self::most_used_tools(&state),
            "recent_performance": Self::recent_performance(&state),
        })
    }

    fn most_used_tools(state: &OrchestratorState) -> Vec<Value> {
        let mut usage: Vec<(String, usize)> = Vec::new();
        for workflow in &state.history {
            for name in &workflow.tools_used {
                match usage.iter_mut().find(|(n, _)| n == name) {
                    Some((_, count)) => *count += 1,
                    None => usage.push((name.clone(), 1)),
                }
            }
        }
        usage.sort_by(|a, b| b.1.cmp(&a.1));
        usage
            .into_iter()
            .take(5)
            .map(|(tool, usage_count)| json!({"tool": tool, "usage_count": usage_count}))
            .collect()
    }

    /// Metrics over the last ten runs.
    fn recent_performance(state: &OrchestratorState) -> Value {
        let recent: Vec<&WorkflowRecord> = state.history.iter().rev().take(10).collect();
        if recent.is_empty() {
            return json!({"recent_workflow_count": 0});
        }

        let count = recent.len() as f64;
        json!({
            "recent_workflow_count": recent.len(),
            "recent_success_rate": recent.iter().filter(|w| w.success).count() as f64 / count,
            "recent_average_secs": recent.iter().map(|w| w.execution_secs).sum::<f64>() / count,
            "recent_average_tools_per_workflow":
                recent.iter().map(|w| w.tools_used.len()).sum::<usize>() as f64 / count,
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("tools", &self.registry.names())
            .field("config", &self.config)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{MockTool, Tool};
    use crate::tools::{AnalysisTool, SearchTool, SynthesisTool, ValidationTool};
    use async_trait::async_trait;
    use std::sync::Arc;
    use strix_search::MockSearch;

    fn full_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(SearchTool::new(Arc::new(MockSearch::empty()))));
        registry.register(Arc::new(AnalysisTool::new()));
        registry.register(Arc::new(SynthesisTool::new()));
        registry.register(Arc::new(ValidationTool::new()));
        registry
    }

    #[test]
    fn test_plan_short_query_is_validation_only() {
        let orchestrator = Orchestrator::new(full_registry());
        let plan = orchestrator.plan("short query", &OrchestrationContext::default());

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].tool_type, ToolType::Validation);
        assert!(plan[0].dependencies.is_empty());
    }

    #[test]
    fn test_plan_recency_query_includes_all_stages() {
        let orchestrator = Orchestrator::new(full_registry());
        let plan = orchestrator.plan(
            "what is the current price of gold today",
            &OrchestrationContext::default(),
        );

        let types: Vec<ToolType> = plan.iter().map(|r| r.tool_type).collect();
        assert_eq!(
            types,
            vec![
                ToolType::Analysis,
                ToolType::Search,
                ToolType::Synthesis,
                ToolType::Validation
            ]
        );

        // Synthesis waits on both upstream tools; validation on synthesis.
        let synthesis = &plan[2];
        assert!(synthesis.dependencies.contains(&"web_search".to_string()));
        assert!(synthesis.dependencies.contains(&"text_analysis".to_string()));
        assert_eq!(plan[3].dependencies, vec!["synthesis".to_string()]);
    }

    #[test]
    fn test_plan_is_idempotent() {
        let orchestrator = Orchestrator::new(full_registry());
        let context = OrchestrationContext::default();
        let query = "what are the latest developments in rust async";

        let first: Vec<(ToolType, Vec<String>)> = orchestrator
            .plan(query, &context)
            .into_iter()
            .map(|r| (r.tool_type, r.dependencies))
            .collect();
        let second: Vec<(ToolType, Vec<String>)> = orchestrator
            .plan(query, &context)
            .into_iter()
            .map(|r| (r.tool_type, r.dependencies))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_prefers_higher_score() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(
            MockTool::new("weak", ToolType::Analysis).with_score(0.4),
        ));
        registry.register(Arc::new(
            MockTool::new("strong", ToolType::Analysis).with_score(0.8),
        ));
        let orchestrator = Orchestrator::new(registry);

        let request = ToolRequest::new(ToolType::Analysis, json!({"content": "text"}));
        let selected = orchestrator.select_tool(&request).unwrap();
        assert_eq!(selected.name(), "strong");
    }

    #[test]
    fn test_selection_returns_none_when_nothing_matches() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("search", ToolType::Search)));
        let orchestrator = Orchestrator::new(registry);

        let request = ToolRequest::new(ToolType::Synthesis, json!({"sources": []}));
        assert!(orchestrator.select_tool(&request).is_none());
    }

    #[tokio::test]
    async fn test_empty_registry_fails_gracefully() {
        let orchestrator = Orchestrator::new(ToolRegistry::new());
        let result = orchestrator
            .orchestrate("anything at all", &OrchestrationContext::default())
            .await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(result.tools_orchestrated, 0);
    }

    #[tokio::test]
    async fn test_orchestrate_full_run() {
        let orchestrator = Orchestrator::new(full_registry());
        let result = orchestrator
            .orchestrate(
                "what is the latest news about rust releases",
                &OrchestrationContext::default(),
            )
            .await;

        assert!(result.success);
        assert_eq!(result.tools_orchestrated, 4);
        assert!(result.tool_breakdown.contains_key("web_search"));
        assert!(result.tool_breakdown.contains_key("synthesis"));
        assert!(result.quality_validation.available);
        assert!(result.synthesis.confidence_assessment > 0.0);
        assert!(result.synthesis.confidence_assessment <= 1.0);
    }

    #[tokio::test]
    async fn test_dependency_ordering_holds() {
        struct OrderedTool {
            inner: ToolType,
            name: &'static str,
            log: Arc<parking_lot::Mutex<Vec<&'static str>>>,
        }

        #[async_trait]
        impl Tool for OrderedTool {
            fn name(&self) -> &str {
                self.name
            }
            fn tool_type(&self) -> ToolType {
                self.inner
            }
            fn can_handle(&self, request: &ToolRequest) -> f64 {
                if request.tool_type == self.inner { 0.9 } else { 0.0 }
            }
            async fn execute(&self, _input: &Value) -> ToolResult {
                self.log.lock().push(self.name);
                ToolResult::success(self.name, self.inner, json!({}), 0.01, 0.8)
            }
        }

        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut registry = ToolRegistry::new();
        for (name, tool_type) in [
            ("web_search", ToolType::Search),
            ("text_analysis", ToolType::Analysis),
            ("synthesis", ToolType::Synthesis),
            ("validation", ToolType::Validation),
        ] {
            registry.register(Arc::new(OrderedTool {
                inner: tool_type,
                name,
                log: log.clone(),
            }));
        }

        let orchestrator = Orchestrator::new(registry);
        orchestrator
            .orchestrate(
                "what are the latest benchmarks for this database",
                &OrchestrationContext::default(),
            )
            .await;

        let order = log.lock().clone();
        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(position("synthesis") > position("web_search"));
        assert!(position("synthesis") > position("text_analysis"));
        assert!(position("validation") > position("synthesis"));
    }

    #[tokio::test]
    async fn test_aggregation_weights_renormalize() {
        // Only analysis and validation run: weights 0.25 and 0.20.
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(
            MockTool::new("text_analysis", ToolType::Analysis).with_confidence(0.9),
        ));
        registry.register(Arc::new(
            MockTool::new("validation", ToolType::Validation).with_confidence(0.6),
        ));
        let orchestrator = Orchestrator::new(registry);

        let result = orchestrator
            .orchestrate(
                "a query long enough to trigger analysis",
                &OrchestrationContext::default(),
            )
            .await;

        let expected = (0.9 * 0.25 + 0.6 * 0.20) / (0.25 + 0.20);
        assert!((result.synthesis.confidence_assessment - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failed_tool_excluded_from_weighting() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(
            MockTool::new("text_analysis", ToolType::Analysis).with_confidence(0.9),
        ));
        registry.register(Arc::new(
            MockTool::new("validation", ToolType::Validation).failing("validator offline"),
        ));
        let orchestrator = Orchestrator::new(registry);

        let result = orchestrator
            .orchestrate(
                "a query long enough to trigger analysis",
                &OrchestrationContext::default(),
            )
            .await;

        assert!(result.success);
        assert!((result.synthesis.confidence_assessment - 0.9).abs() < 1e-9);
        assert!(!result.tool_breakdown["validation"].success);
        assert!(!result
            .synthesis
            .tool_contributions
            .contains_key("validation"));
    }

    #[tokio::test]
    async fn test_single_source_lowers_quality_downstream() {
        let one = OrchestrationContext::with_sources(vec![
            json!({"content": "Quarterly revenue data from the annual research report.", "type": "search"}),
        ]);
        let two = OrchestrationContext::with_sources(vec![
            json!({"content": "Quarterly revenue data from the annual research report.", "type": "search"}),
            json!({"content": "Independent analysis confirms the quarterly revenue data.", "type": "analysis"}),
        ]);
        let query = "please evaluate these quarterly findings";

        let orchestrator = Orchestrator::new(full_registry());
        let result_one = orchestrator.orchestrate(query, &one).await;
        let result_two = orchestrator.orchestrate(query, &two).await;

        assert!(
            result_one.synthesis.confidence_assessment
                < result_two.synthesis.confidence_assessment
        );
        assert!(result_one.quality_validation.quality_score <= result_two.quality_validation.quality_score);
    }

    #[tokio::test]
    async fn test_statistics_track_runs() {
        let orchestrator = Orchestrator::new(full_registry());
        orchestrator
            .orchestrate("what is the latest rust news today", &OrchestrationContext::default())
            .await;
        orchestrator
            .orchestrate("short", &OrchestrationContext::default())
            .await;

        let stats = orchestrator.statistics();
        assert_eq!(stats["total_workflows"], 2);
        assert_eq!(stats["successful_workflows"], 2);
        assert_eq!(stats["tools_available"], 4);
        assert_eq!(stats["recent_performance"]["recent_workflow_count"], 2);

        let validation_stats = orchestrator.tool_stats("validation").unwrap();
        assert_eq!(validation_stats.total_executions, 2);
        assert!((validation_stats.success_rate - 1.0).abs() < 1e-9);

        assert!(matches!(
            orchestrator.tool_stats("no_such_tool"),
            Err(crate::error::AgentError::ToolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let orchestrator = Orchestrator::with_config(
            full_registry(),
            OrchestratorConfig { history_limit: 3 },
        );
        for _ in 0..5 {
            orchestrator
                .orchestrate("short", &OrchestrationContext::default())
                .await;
        }

        let stats = orchestrator.statistics();
        assert_eq!(stats["total_workflows"], 3);
    }
}
