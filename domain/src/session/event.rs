//! The caller-facing event union.
//!
//! Everything the orchestrator may emit, as a closed tagged union. Events
//! are write-once and ordered: a consumer that has seen `agent_done` for an
//! agent never sees another chunk for that agent in the same run.

use crate::agent::AgentId;
use crate::idea::{Idea, ScoredIdea};
use crate::report::Report;
use serde::{Deserialize, Serialize};

/// One event on the session's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Orchestration status, for display only.
    Orchestrator { text: String },
    /// Control moved from one agent to the next.
    Handoff {
        from: AgentId,
        to: AgentId,
        reason: String,
    },
    /// Emitted before the first byte of an agent's output is requested.
    AgentStart { agent: AgentId },
    /// One increment of streamed text, in provider order.
    AgentChunk { agent: AgentId, text: String },
    /// The provider signalled completion for this agent. Exactly one per run.
    AgentDone { agent: AgentId },
    /// Phase 1 produced its candidate list; the caller must select.
    AwaitingSelection {
        ideas: Vec<Idea>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scores: Option<Vec<ScoredIdea>>,
    },
    /// Phase 2 finished; carries the narrative text and the structured report.
    Report { text: String, data: Box<Report> },
    /// The pipeline failed. Terminal; at most one per run.
    Error { message: String },
}

impl PipelineEvent {
    pub fn status(text: impl Into<String>) -> Self {
        PipelineEvent::Orchestrator { text: text.into() }
    }

    pub fn handoff(from: AgentId, to: AgentId, reason: impl Into<String>) -> Self {
        PipelineEvent::Handoff {
            from,
            to,
            reason: reason.into(),
        }
    }

    /// The agent this event belongs to, if any.
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            PipelineEvent::AgentStart { agent }
            | PipelineEvent::AgentChunk { agent, .. }
            | PipelineEvent::AgentDone { agent } => Some(*agent),
            _ => None,
        }
    }

    /// Whether this event terminates the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineEvent::Report { .. } | PipelineEvent::Error { .. }
        )
    }
}
