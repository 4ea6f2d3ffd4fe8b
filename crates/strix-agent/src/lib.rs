//! Agent core for Strix: multi-tool orchestration and the per-turn
//! agentic workflow engine.
//!
//! The [`Orchestrator`] plans and runs registered [`Tool`]s with
//! dependency ordering and rolling performance stats; the
//! [`WorkflowEngine`] drives the fixed Analyze / Search / Synthesize /
//! Validate / Respond sequence for a chat turn, optionally enriched by an
//! orchestration pass.

pub mod classify;
pub mod error;
pub mod lexicon;
pub mod orchestrator;
pub mod tool;
pub mod tools;
pub mod types;
pub mod workflow;

pub use classify::{KeywordClassifier, QueryClassifier, QueryComplexity, QueryType};
pub use error::{AgentError, Result};
pub use orchestrator::{OrchestrationContext, Orchestrator, OrchestratorConfig};
pub use tool::{SharedTool, Tool, ToolRegistry};
pub use tools::{AnalysisTool, SearchTool, SynthesisTool, ValidationTool};
pub use types::{
    OrchestrationResult, QualityValidation, StepKind, ToolPriority, ToolRequest, ToolResult,
    ToolStats, ToolSynthesis, ToolType, Workflow, WorkflowStep,
};
pub use workflow::{WorkflowConfig, WorkflowEngine};

use std::sync::Arc;
use strix_search::SharedSearch;

/// Build a registry with the four built-in tools.
pub fn default_registry(search: SharedSearch) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchTool::new(search)));
    registry.register(Arc::new(AnalysisTool::new()));
    registry.register(Arc::new(SynthesisTool::new()));
    registry.register(Arc::new(ValidationTool::new()));
    registry
}
