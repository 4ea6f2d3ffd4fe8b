//! Typed events emitted while processing one chat turn.

use serde::{Deserialize, Serialize};

use strix_agent::StepKind;

/// One event in the ordered stream produced for a chat turn.
///
/// Serialized with a `type` tag so transports can frame them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The workflow for this turn has started.
    WorkflowStart { query: String },
    /// Step report for the completed workflow, one event per step in
    /// execution order. Emitted after the workflow has finished, so these
    /// are not live: transports that need token-level liveness should
    /// stream from `LlmBackend::complete_stream` instead.
    WorkflowProgress {
        step: StepKind,
        success: bool,
        execution_secs: f64,
    },
    /// A chunk of response text.
    Content { text: String },
    /// Summary of the completed workflow.
    WorkflowSummary {
        workflow_id: String,
        success: bool,
        steps_completed: usize,
        total_execution_secs: f64,
    },
    /// The assistant turn was persisted; the stream is finished.
    Complete { message_id: String },
    /// Processing failed; the stream is finished.
    Error { message: String },
}

impl SessionEvent {
    pub fn workflow_start(query: impl Into<String>) -> Self {
        Self::WorkflowStart {
            query: query.into(),
        }
    }

    pub fn progress(step: StepKind, success: bool, execution_secs: f64) -> Self {
        Self::WorkflowProgress {
            step,
            success,
            execution_secs,
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self::Content { text: text.into() }
    }

    pub fn complete(message_id: impl Into<String>) -> Self {
        Self::Complete {
            message_id: message_id.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = SessionEvent::workflow_start("hello");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "workflow_start");
        assert_eq!(json["query"], "hello");

        let event = SessionEvent::progress(StepKind::Analyze, true, 0.01);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "workflow_progress");
        assert_eq!(json["step"], "analyze");

        let event = SessionEvent::error("boom");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
    }

    #[test]
    fn test_round_trip() {
        let event = SessionEvent::complete("msg_1");
        let json = serde_json::to_string(&event).unwrap();
        let restored: SessionEvent = serde_json::from_str(&json).unwrap();
        match restored {
            SessionEvent::Complete { message_id } => assert_eq!(message_id, "msg_1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
