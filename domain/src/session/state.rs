//! The session phase state machine.
//!
//! `idle -> phase1_running -> awaiting_selection` and
//! `idle -> phase2_running -> done`, with a terminal `errored` reachable from
//! any running state. Selection happens out-of-band, so `awaiting_selection`
//! is terminal for a single invocation; a later phase-2 request starts a new
//! machine.

use crate::session::Phase;
use serde::Serialize;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Phase1Running,
    AwaitingSelection,
    Phase2Running,
    Done,
    Errored,
}

impl SessionState {
    /// Enter the running state for a phase. Only valid from `Idle`;
    /// any other source sticks at `Errored`.
    pub fn start(self, phase: Phase) -> SessionState {
        match (self, phase) {
            (SessionState::Idle, Phase::Ideation) => SessionState::Phase1Running,
            (SessionState::Idle, Phase::Production) => SessionState::Phase2Running,
            _ => SessionState::Errored,
        }
    }

    /// Phase 1 produced a candidate list; the caller must now select.
    pub fn await_selection(self) -> SessionState {
        match self {
            SessionState::Phase1Running => SessionState::AwaitingSelection,
            _ => SessionState::Errored,
        }
    }

    /// The run finished cleanly (phase 1 without a selection step, or
    /// phase 2 after the report event).
    pub fn complete(self) -> SessionState {
        match self {
            SessionState::Phase1Running | SessionState::Phase2Running => SessionState::Done,
            _ => SessionState::Errored,
        }
    }

    /// An unrecoverable failure. Terminal states stay terminal.
    pub fn fail(self) -> SessionState {
        match self {
            SessionState::Done | SessionState::AwaitingSelection => self,
            _ => SessionState::Errored,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::AwaitingSelection | SessionState::Done | SessionState::Errored
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase1_happy_path() {
        let state = SessionState::Idle.start(Phase::Ideation);
        assert_eq!(state, SessionState::Phase1Running);
        let state = state.await_selection();
        assert_eq!(state, SessionState::AwaitingSelection);
        assert!(state.is_terminal());
    }

    #[test]
    fn phase1_without_selection_completes() {
        let state = SessionState::Idle.start(Phase::Ideation).complete();
        assert_eq!(state, SessionState::Done);
    }

    #[test]
    fn phase2_happy_path() {
        let state = SessionState::Idle.start(Phase::Production);
        assert_eq!(state, SessionState::Phase2Running);
        assert_eq!(state.complete(), SessionState::Done);
    }

    #[test]
    fn failure_is_reachable_from_running_states() {
        assert_eq!(
            SessionState::Idle.start(Phase::Ideation).fail(),
            SessionState::Errored
        );
        assert_eq!(
            SessionState::Idle.start(Phase::Production).fail(),
            SessionState::Errored
        );
    }

    #[test]
    fn completed_states_do_not_fail() {
        assert_eq!(SessionState::Done.fail(), SessionState::Done);
        assert_eq!(
            SessionState::AwaitingSelection.fail(),
            SessionState::AwaitingSelection
        );
    }

    #[test]
    fn double_start_is_invalid() {
        let state = SessionState::Idle.start(Phase::Ideation);
        assert_eq!(state.start(Phase::Production), SessionState::Errored);
    }
}
