//! CLI command handlers.

pub mod ask;
pub mod chat;
pub mod tools;

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use strix_agent::{Orchestrator, WorkflowConfig, WorkflowEngine, default_registry};
use strix_llm::OpenAiBackend;
use strix_search::{DuckDuckGoClient, SharedSearch};
use strix_session::{ChatSessionCoordinator, MemoryStore};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Model identifier for the completion backend.
    pub model: String,
    /// Output events as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// A fully wired chat session: coordinator plus the handles the REPL
/// needs for statistics.
pub struct Session {
    pub coordinator: ChatSessionCoordinator,
    pub engine: Arc<WorkflowEngine>,
    pub orchestrator: Arc<Orchestrator>,
    pub conversation_id: String,
}

impl Session {
    pub fn new_conversation_id() -> String {
        format!("conv_{}", Uuid::new_v4().simple())
    }
}

/// Wire up search, orchestration, and the workflow engine for one session.
///
/// The completion backend is optional: without `OPENAI_API_KEY` the
/// engine falls back to its template response.
pub fn build_session(ctx: &Context) -> Result<Session> {
    let search: SharedSearch = Arc::new(DuckDuckGoClient::new()?);
    let orchestrator = Arc::new(Orchestrator::new(default_registry(search.clone())));

    let mut engine = WorkflowEngine::new()
        .with_search(search)
        .with_orchestrator(orchestrator.clone())
        .with_config(WorkflowConfig {
            model: ctx.model.clone(),
            ..Default::default()
        });

    match OpenAiBackend::from_env() {
        Ok(backend) => engine = engine.with_backend(Arc::new(backend)),
        Err(_) => {
            tracing::info!("OPENAI_API_KEY not set, responses use the built-in fallback");
        }
    }

    let engine = Arc::new(engine);
    let coordinator =
        ChatSessionCoordinator::new(engine.clone(), Arc::new(MemoryStore::new()));

    Ok(Session {
        coordinator,
        engine,
        orchestrator,
        conversation_id: Session::new_conversation_id(),
    })
}
