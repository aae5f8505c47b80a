//! Per-agent run records and token accounting.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};

/// Token counters reported by the provider for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Mutable record of one agent invocation.
///
/// Created when the agent starts, appended to on each chunk, then frozen
/// once the provider signals completion or failure. Downstream steps
/// (parsing, scoring, assembly) only read frozen runs.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    pub agent: AgentId,
    /// Accumulated text, grows on each chunk.
    pub text: String,
    /// Set once the provider signals completion.
    pub done: bool,
    pub usage: TokenUsage,
    /// Captured error message, if the invocation failed.
    pub error: Option<String>,
}

impl AgentRun {
    pub fn new(agent: AgentId) -> Self {
        Self {
            agent,
            text: String::new(),
            done: false,
            usage: TokenUsage::default(),
            error: None,
        }
    }

    /// Append one increment of streamed text.
    pub fn append(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// Freeze the run as completed.
    pub fn complete(&mut self, usage: TokenUsage) {
        self.done = true;
        self.usage = usage;
    }

    /// Freeze the run as failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.done = true;
        self.error = Some(message.into());
    }
}
