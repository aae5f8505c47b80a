//! Use cases

pub mod run_session;

pub use run_session::{SessionError, SessionOrchestrator, SessionOutcome};
