//! Application layer for atelier
//!
//! Use cases and ports. The [`SessionOrchestrator`] composes the agent
//! invoker, the candidate scorer, and the confidence auditor into the
//! two-phase pipeline, pushing typed events to a single subscriber through
//! an [`EventSender`]. Provider access goes through the
//! [`ProviderGateway`](ports::provider_gateway::ProviderGateway) port;
//! adapters live in the infrastructure layer.

pub mod auditor;
pub mod catalog;
pub mod events;
pub mod invoker;
pub mod ports;
pub mod scorer;
pub mod use_cases;

pub use auditor::ConfidenceAuditor;
pub use catalog::{AgentCatalogEntry, agent_catalog};
pub use events::{ChannelClosed, EventSender};
pub use invoker::{AgentInvoker, InvokeError};
pub use ports::{
    CallSpec, Completion, GatewayError, NoTranscript, ProviderGateway, ProviderSession,
    StreamHandle, TranscriptLogger,
};
pub use scorer::{CandidateScorer, ScoreOutcome, TOP_CANDIDATES};
pub use use_cases::{SessionError, SessionOrchestrator, SessionOutcome};
