//! Domain layer for atelier
//!
//! This crate contains the core business logic, entities, and value objects
//! of the pipeline. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Two phases
//!
//! A session runs one of two caller-visible phases: ideation (strategist +
//! idea generator, ending on a candidate selection) or production (architect
//! through finisher, ending on the assembled report). Selection happens
//! out-of-band; the phases share only serialized prior outputs.
//!
//! ## Tolerant extraction
//!
//! Agents return free text that is supposed to be JSON but often isn't.
//! [`extract::extract`] applies strict parse → fence narrowing → repair
//! parse, and callers degrade to raw text (or the legacy markdown split)
//! when all of it fails.

pub mod agent;
pub mod core;
pub mod extract;
pub mod idea;
pub mod prompt;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use agent::{AgentId, PromptStyle};
pub use core::error::DomainError;
pub use extract::extract;
pub use idea::{Idea, ScoredIdea, legacy_split, parse_ideas};
pub use prompt::{PromptCatalog, StepPrompt};
pub use report::{
    ConfidenceEntry, ConfidenceMap, REPORT_SCHEMA_VERSION, Report, SectionContent,
};
pub use session::{
    AgentRun, Phase, PipelineEvent, ProviderEvent, SessionRequest, SessionState, TokenUsage,
};
