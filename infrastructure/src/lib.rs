//! Infrastructure layer for atelier
//!
//! Adapters for the application-layer ports: the Gemini provider gateway,
//! TOML/figment configuration loading, and the JSONL transcript logger.

pub mod config;
pub mod logging;
pub mod providers;

pub use config::{ConfigLoader, FileConfig, ProviderConfig, TranscriptConfig};
pub use logging::JsonlTranscriptLogger;
pub use providers::GeminiGateway;
