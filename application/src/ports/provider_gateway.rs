//! Provider gateway port
//!
//! Defines the interface for communicating with the generative-text
//! provider. One [`ProviderSession`] wraps one call: the orchestrator never
//! reuses a session across agents, because every step's instruction depends
//! on the previous step's accumulated output.

use async_trait::async_trait;
use atelier_domain::{AgentId, ProviderEvent, TokenUsage};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,
}

/// Everything one provider call needs.
#[derive(Debug, Clone)]
pub struct CallSpec {
    /// The agent this call runs on behalf of. Drives labels and bounds.
    pub agent: AgentId,
    /// Non-empty system instruction.
    pub system_instruction: String,
    /// Grants the provider's fact-checking/web-search capability.
    /// Currently: strategist during phase 1, auditor during the audit pass.
    pub tools_enabled: bool,
    /// Per-role output bound, forwarded to the provider.
    pub max_output_tokens: u32,
}

impl CallSpec {
    /// Build a spec for an agent with its role-default output bound.
    pub fn for_agent(agent: AgentId, system_instruction: impl Into<String>) -> Self {
        Self {
            agent,
            system_instruction: system_instruction.into(),
            tools_enabled: false,
            max_output_tokens: agent.max_output_tokens(),
        }
    }

    pub fn with_tools(mut self) -> Self {
        self.tools_enabled = true;
        self
    }
}

/// A finished non-streamed call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Gateway for provider communication
///
/// This port defines how the application layer reaches the text-generation
/// capability. The gateway is stateless from the orchestrator's point of
/// view; no locking is required across concurrent sessions.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Open a one-shot session for the given call.
    async fn open(&self, spec: CallSpec) -> Result<Box<dyn ProviderSession>, GatewayError>;
}

/// Handle for receiving streaming events from a provider call.
///
/// Wraps an `mpsc::Receiver<ProviderEvent>` so the invoker can forward
/// chunks without blocking the provider read loop.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<ProviderEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<ProviderEvent>) -> Self {
        Self { receiver }
    }

    /// Drain the stream into a single [`Completion`].
    ///
    /// Useful when streaming is available at the transport level but the
    /// caller only needs the final text (scorer, auditor).
    pub async fn collect(mut self) -> Result<Completion, GatewayError> {
        let mut text = String::new();
        let mut usage = TokenUsage::default();

        while let Some(event) = self.receiver.recv().await {
            match event {
                ProviderEvent::Delta(chunk) => text.push_str(&chunk),
                ProviderEvent::Completed { usage: counted } => {
                    usage = counted;
                    break;
                }
                ProviderEvent::Error(message) => {
                    return Err(GatewayError::RequestFailed(message));
                }
            }
        }

        Ok(Completion { text, usage })
    }
}

/// One active provider call
#[async_trait]
pub trait ProviderSession: Send + Sync {
    /// Send the user message and wait for the full response.
    ///
    /// Default implementation drains [`send_streaming`](Self::send_streaming),
    /// so streaming adapters get this for free.
    async fn send(&self, user_message: &str) -> Result<Completion, GatewayError> {
        self.send_streaming(user_message).await?.collect().await
    }

    /// Send the user message and stream the response.
    async fn send_streaming(&self, user_message: &str) -> Result<StreamHandle, GatewayError>;
}
