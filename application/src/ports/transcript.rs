//! Transcript logging port
//!
//! Best-effort record of finished agent runs. Implementations must swallow
//! their own failures; a broken transcript never affects the pipeline.

use atelier_domain::AgentRun;

/// Sink for frozen agent runs.
pub trait TranscriptLogger: Send + Sync {
    /// Record one finished run. Called after the run is frozen.
    fn record(&self, run: &AgentRun);
}

/// No-op logger for when transcripts are not wanted.
pub struct NoTranscript;

impl TranscriptLogger for NoTranscript {
    fn record(&self, _run: &AgentRun) {}
}
