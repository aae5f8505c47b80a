//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These cover request validation and state-machine misuse. Provider and
/// channel failures live in the application layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("brief must not be empty")]
    EmptyBrief,

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("unknown style: {0}")]
    UnknownStyle(String),

    #[error("agent {0} is internal and cannot be enabled")]
    InternalAgent(String),

    #[error("phase 2 requires a selected idea")]
    MissingSelection,

    #[error("invalid phase: {0}")]
    InvalidPhase(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(DomainError::EmptyBrief.to_string(), "brief must not be empty");
        assert_eq!(
            DomainError::UnknownAgent("poet".into()).to_string(),
            "unknown agent: poet"
        );
    }
}
