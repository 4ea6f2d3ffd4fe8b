//! Core value objects for tools, orchestration, and workflows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Tool Types
// ─────────────────────────────────────────────────────────────────────────────

/// The capability category a tool belongs to.
///
/// Each tool declares exactly one type; `can_handle` returns 0.0 for any
/// request of a different type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    /// External information retrieval.
    Search,
    /// Text/content analysis.
    Analysis,
    /// Multi-source information integration.
    Synthesis,
    /// Quality and accuracy checking.
    Validation,
}

impl ToolType {
    /// Stable string name used in payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Search => "search",
            ToolType::Analysis => "analysis",
            ToolType::Synthesis => "synthesis",
            ToolType::Validation => "validation",
        }
    }

    /// Weight used when aggregating per-tool confidences into an overall
    /// confidence assessment.
    pub fn confidence_weight(&self) -> f64 {
        match self {
            ToolType::Search => 0.30,
            ToolType::Analysis => 0.25,
            ToolType::Synthesis => 0.25,
            ToolType::Validation => 0.20,
        }
    }
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tool execution priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// A planned request for tool execution.
///
/// Produced by the orchestrator's planning step; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Which capability category should handle this.
    pub tool_type: ToolType,
    /// Input payload passed to the tool's `execute`.
    pub input_data: Value,
    /// Execution priority.
    pub priority: ToolPriority,
    /// Timeout hint in seconds; enforcement is up to the tool itself.
    pub timeout_secs: f64,
    /// Names of tools that must complete before this request runs.
    pub dependencies: Vec<String>,
}

impl ToolRequest {
    /// Create a request with medium priority and the default timeout.
    pub fn new(tool_type: ToolType, input_data: Value) -> Self {
        Self {
            tool_type,
            input_data,
            priority: ToolPriority::Medium,
            timeout_secs: 30.0,
            dependencies: Vec::new(),
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: ToolPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the dependency list.
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// Result of a single tool invocation.
///
/// Created exactly once per invocation and never mutated. A failed
/// execution is data, not an error: `success = false`, `confidence = 0.0`,
/// and `error` populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that ran.
    pub tool_name: String,
    /// The tool's declared type.
    pub tool_type: ToolType,
    /// Whether execution succeeded.
    pub success: bool,
    /// Tool-specific structured findings.
    pub payload: Value,
    /// Wall-clock execution time of this invocation, in seconds.
    pub execution_secs: f64,
    /// Tool-reported confidence in [0, 1].
    pub confidence: f64,
    /// Tool-specific metadata.
    pub metadata: Value,
    /// Error message when `success` is false.
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result.
    pub fn success(
        tool_name: impl Into<String>,
        tool_type: ToolType,
        payload: Value,
        execution_secs: f64,
        confidence: f64,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_type,
            success: true,
            payload,
            execution_secs,
            confidence: confidence.clamp(0.0, 1.0),
            metadata: Value::Object(Default::default()),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(
        tool_name: impl Into<String>,
        tool_type: ToolType,
        execution_secs: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_type,
            success: false,
            payload: Value::Null,
            execution_secs,
            confidence: 0.0,
            metadata: Value::Object(Default::default()),
            error: Some(error.into()),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflow Types
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of step in an agentic workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Multi-tool orchestration pseudo-step.
    Orchestrate,
    /// Query intent analysis.
    Analyze,
    /// External information gathering.
    Search,
    /// Information integration.
    Synthesize,
    /// Response quality check.
    Validate,
    /// Final response generation.
    Respond,
}

impl StepKind {
    /// Stable string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Orchestrate => "orchestrate",
            StepKind::Analyze => "analyze",
            StepKind::Search => "search",
            StepKind::Synthesize => "synthesize",
            StepKind::Validate => "validate",
            StepKind::Respond => "respond",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One executed step of a workflow.
///
/// Appended to the owning workflow in execution order; never removed or
/// reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// What kind of step this was.
    pub kind: StepKind,
    /// Human-readable description.
    pub description: String,
    /// Input snapshot the step ran with.
    pub input: Value,
    /// Structured output, when the step produced any.
    pub output: Option<Value>,
    /// Whether the step succeeded.
    pub success: bool,
    /// Wall-clock time spent in this step alone, in seconds.
    pub execution_secs: f64,
    /// Error message when the step failed.
    pub error: Option<String>,
}

impl WorkflowStep {
    /// Create a pending step record.
    pub fn new(kind: StepKind, description: impl Into<String>, input: Value) -> Self {
        Self {
            kind,
            description: description.into(),
            input,
            output: None,
            success: false,
            execution_secs: 0.0,
            error: None,
        }
    }

    /// Mark the step successful with the given output.
    pub fn succeed(mut self, output: Value, execution_secs: f64) -> Self {
        self.output = Some(output);
        self.success = true;
        self.execution_secs = execution_secs;
        self
    }

    /// Mark the step failed.
    pub fn fail(mut self, error: impl Into<String>, execution_secs: f64) -> Self {
        self.error = Some(error.into());
        self.success = false;
        self.execution_secs = execution_secs;
        self
    }

    /// Mark the step failed but keep partial output.
    pub fn fail_with_output(
        mut self,
        error: impl Into<String>,
        output: Value,
        execution_secs: f64,
    ) -> Self {
        self.error = Some(error.into());
        self.output = Some(output);
        self.success = false;
        self.execution_secs = execution_secs;
        self
    }
}

/// A complete agentic workflow run.
///
/// Mutated only by appending steps and setting the final fields; treated
/// as an immutable record once returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique id for this run.
    pub workflow_id: String,
    /// The query that started the run.
    pub user_query: String,
    /// Steps in execution order.
    pub steps: Vec<WorkflowStep>,
    /// The final response text. Never empty for a successful run.
    pub final_response: String,
    /// Total wall-clock time for the whole run, in seconds.
    pub total_execution_secs: f64,
    /// True iff the terminal Respond step succeeded.
    pub success: bool,
}

impl Workflow {
    /// Create a new workflow for the given query.
    pub fn new(workflow_id: impl Into<String>, user_query: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            user_query: user_query.into(),
            steps: Vec::new(),
            final_response: String::new(),
            total_execution_secs: 0.0,
            success: false,
        }
    }

    /// The step kinds in execution order.
    pub fn step_kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    /// Find the first step of the given kind.
    pub fn step(&self, kind: StepKind) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.kind == kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestration Result Types
// ─────────────────────────────────────────────────────────────────────────────

/// Per-tool contribution to an orchestration synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContribution {
    /// The contributing tool's type.
    pub tool_type: ToolType,
    /// Its reported confidence.
    pub confidence: f64,
    /// Its execution time in seconds.
    pub execution_secs: f64,
    /// Up to three findings extracted from its payload.
    pub key_findings: Vec<String>,
    /// Its metadata.
    pub metadata: Value,
}

/// Summary statistics over one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationSummary {
    /// Tools that were executed (successful or not).
    pub tools_executed: usize,
    /// Tools that reported success.
    pub successful_tools: usize,
    /// Sum of per-tool execution times.
    pub total_execution_secs: f64,
    /// Unweighted mean confidence over all executed tools.
    pub average_confidence: f64,
}

/// The aggregated synthesis of all tool results from one orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSynthesis {
    /// Summary statistics.
    pub summary: OrchestrationSummary,
    /// Contributions keyed by tool name (successful tools only).
    pub tool_contributions: BTreeMap<String, ToolContribution>,
    /// Cross-tool insights.
    pub integrated_insights: Vec<String>,
    /// Weighted overall confidence in [0, 1].
    pub confidence_assessment: f64,
}

impl ToolSynthesis {
    /// An empty synthesis (no tools ran).
    pub fn empty() -> Self {
        Self {
            summary: OrchestrationSummary {
                tools_executed: 0,
                successful_tools: 0,
                total_execution_secs: 0.0,
                average_confidence: 0.0,
            },
            tool_contributions: BTreeMap::new(),
            integrated_insights: Vec::new(),
            confidence_assessment: 0.0,
        }
    }
}

/// Result of running the validation tool against the synthesis itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityValidation {
    /// Whether a validation tool was available at all.
    pub available: bool,
    /// Whether the validation run succeeded.
    pub success: bool,
    /// Composite quality score in [0, 1].
    pub quality_score: f64,
    /// The validation tool's reported confidence.
    pub validation_confidence: f64,
    /// Improvement recommendations.
    pub recommendations: Vec<String>,
}

impl QualityValidation {
    /// No validation tool was registered.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            success: false,
            quality_score: 0.0,
            validation_confidence: 0.0,
            recommendations: Vec::new(),
        }
    }
}

/// Result of one orchestration call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationResult {
    /// Whether orchestration as a whole succeeded.
    pub success: bool,
    /// Unique id for this orchestration run.
    pub workflow_id: String,
    /// Number of tools that were executed.
    pub tools_orchestrated: usize,
    /// Wall-clock time for the whole orchestration, in seconds.
    pub execution_secs: f64,
    /// Aggregated synthesis across tools.
    pub synthesis: ToolSynthesis,
    /// Meta-validation of the synthesis.
    pub quality_validation: QualityValidation,
    /// All individual tool results, keyed by tool name.
    pub tool_breakdown: BTreeMap<String, ToolResult>,
    /// Error message when `success` is false.
    pub error: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rolling Tool Statistics
// ─────────────────────────────────────────────────────────────────────────────

/// Rolling performance statistics for one tool.
///
/// Updated incrementally after each execution rather than recomputed from
/// the full history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolStats {
    /// Total number of executions observed.
    pub total_executions: u64,
    /// Fraction of executions that succeeded.
    pub success_rate: f64,
    /// Mean execution time in seconds.
    pub average_execution_secs: f64,
    /// Mean reported confidence.
    pub average_confidence: f64,
}

impl ToolStats {
    /// Fold one execution into the rolling stats.
    pub fn record(&mut self, result: &ToolResult) {
        let prev = self.total_executions as f64;
        self.total_executions += 1;
        let n = self.total_executions as f64;

        let successes = self.success_rate * prev + if result.success { 1.0 } else { 0.0 };
        self.success_rate = successes / n;

        self.average_execution_secs =
            (self.average_execution_secs * prev + result.execution_secs) / n;
        self.average_confidence = (self.average_confidence * prev + result.confidence) / n;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_type_weights_sum_to_one() {
        let total = [
            ToolType::Search,
            ToolType::Analysis,
            ToolType::Synthesis,
            ToolType::Validation,
        ]
        .iter()
        .map(|t| t.confidence_weight())
        .sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tool_result_success_clamps_confidence() {
        let result = ToolResult::success("t", ToolType::Analysis, json!({}), 0.1, 1.5);
        assert_eq!(result.confidence, 1.0);

        let result = ToolResult::success("t", ToolType::Analysis, json!({}), 0.1, -0.2);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_tool_result_failure_zeroes_confidence() {
        let result = ToolResult::failure("t", ToolType::Search, 0.2, "network down");
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.error.as_deref(), Some("network down"));
    }

    #[test]
    fn test_workflow_step_transitions() {
        let step = WorkflowStep::new(StepKind::Analyze, "analyze query", json!({"query": "hi"}));
        assert!(!step.success);

        let done = step.clone().succeed(json!({"query_type": "general"}), 0.01);
        assert!(done.success);
        assert!(done.output.is_some());

        let failed = step.fail("boom", 0.01);
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_workflow_step_lookup() {
        let mut workflow = Workflow::new("wf_1", "q");
        workflow
            .steps
            .push(WorkflowStep::new(StepKind::Analyze, "a", json!({})).succeed(json!({}), 0.0));
        workflow
            .steps
            .push(WorkflowStep::new(StepKind::Respond, "r", json!({})).succeed(json!({}), 0.0));

        assert_eq!(
            workflow.step_kinds(),
            vec![StepKind::Analyze, StepKind::Respond]
        );
        assert!(workflow.step(StepKind::Analyze).is_some());
        assert!(workflow.step(StepKind::Search).is_none());
    }

    #[test]
    fn test_tool_stats_incremental_update() {
        let mut stats = ToolStats::default();

        let ok = ToolResult::success("t", ToolType::Search, json!({}), 1.0, 0.8);
        let bad = ToolResult::failure("t", ToolType::Search, 3.0, "err");

        stats.record(&ok);
        assert_eq!(stats.total_executions, 1);
        assert!((stats.success_rate - 1.0).abs() < 1e-9);

        stats.record(&bad);
        assert_eq!(stats.total_executions, 2);
        assert!((stats.success_rate - 0.5).abs() < 1e-9);
        assert!((stats.average_execution_secs - 2.0).abs() < 1e-9);
        assert!((stats.average_confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_serde_round_trip_tool_request() {
        let request = ToolRequest::new(ToolType::Synthesis, json!({"sources": []}))
            .with_priority(ToolPriority::High)
            .with_dependencies(vec!["web_search".to_string()]);

        let json = serde_json::to_string(&request).unwrap();
        let restored: ToolRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.tool_type, ToolType::Synthesis);
        assert_eq!(restored.dependencies, vec!["web_search"]);
    }
}
