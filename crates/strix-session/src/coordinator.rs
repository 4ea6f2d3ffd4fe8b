//! Chat session coordination: persistence, workflow execution, and the
//! per-turn event stream.

use async_stream::stream;
use futures::Stream;
use std::sync::Arc;

use strix_agent::WorkflowEngine;
use strix_llm::{Message, Role};

use crate::events::SessionEvent;
use crate::store::SharedStore;

/// Feeds conversation history and the new query into the workflow engine,
/// emits the ordered event stream for the turn, and persists both turns.
///
/// Pure plumbing: the engine owns every decision about how the turn is
/// processed.
pub struct ChatSessionCoordinator {
    engine: Arc<WorkflowEngine>,
    store: SharedStore,
}

impl ChatSessionCoordinator {
    pub fn new(engine: Arc<WorkflowEngine>, store: SharedStore) -> Self {
        Self { engine, store }
    }

    /// Process one user message and stream the resulting events.
    ///
    /// The workflow runs to completion first; everything after
    /// `WorkflowStart` is a report of the finished run, with the per-step
    /// `WorkflowProgress` events replayed in execution order. The stream
    /// always terminates with either `Complete` or `Error`.
    pub fn process_message(
        &self,
        conversation_id: String,
        user_message: String,
    ) -> impl Stream<Item = SessionEvent> + '_ {
        stream! {
            yield SessionEvent::workflow_start(user_message.clone());

            // History is read before the new turn lands so the engine
            // sees only prior context.
            let history = match self.store.history(&conversation_id).await {
                Ok(history) => history,
                Err(err) => {
                    tracing::error!(error = %err, "failed to load conversation history");
                    yield SessionEvent::error(err.to_string());
                    return;
                }
            };
            if let Err(err) = self
                .store
                .append(&conversation_id, Role::User, &user_message)
                .await
            {
                tracing::error!(error = %err, "failed to persist user turn");
                yield SessionEvent::error(err.to_string());
                return;
            }

            let messages: Vec<Message> = history
                .iter()
                .map(|m| Message {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect();

            let workflow = self.engine.execute_workflow(&user_message, &messages).await;

            for step in &workflow.steps {
                yield SessionEvent::progress(step.kind, step.success, step.execution_secs);
            }
            yield SessionEvent::content(workflow.final_response.clone());
            yield SessionEvent::WorkflowSummary {
                workflow_id: workflow.workflow_id.clone(),
                success: workflow.success,
                steps_completed: workflow.steps.len(),
                total_execution_secs: workflow.total_execution_secs,
            };

            match self
                .store
                .append(&conversation_id, Role::Assistant, &workflow.final_response)
                .await
            {
                Ok(message_id) => yield SessionEvent::complete(message_id),
                Err(err) => {
                    tracing::error!(error = %err, "failed to persist assistant turn");
                    yield SessionEvent::error(err.to_string());
                }
            }
        }
    }
}
