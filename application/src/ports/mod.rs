//! Ports: interfaces the application layer depends on.
//!
//! Implementations (adapters) live in the infrastructure layer.

pub mod provider_gateway;
pub mod transcript;

pub use provider_gateway::{
    CallSpec, Completion, GatewayError, ProviderGateway, ProviderSession, StreamHandle,
};
pub use transcript::{NoTranscript, TranscriptLogger};
