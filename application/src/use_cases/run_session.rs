//! Run Session use case
//!
//! Orchestrates one pipeline run: the two-phase state machine, the event
//! stream, idea extraction and scoring, report assembly, and the
//! best-effort confidence audit. One orchestrator instance serves one
//! inbound request; nothing is shared across concurrent runs except the
//! stateless provider gateway.

use crate::auditor::ConfidenceAuditor;
use crate::events::{ChannelClosed, EventSender};
use crate::invoker::{AgentInvoker, InvokeError};
use crate::ports::provider_gateway::{CallSpec, GatewayError, ProviderGateway};
use crate::ports::transcript::{NoTranscript, TranscriptLogger};
use crate::scorer::{CandidateScorer, TOP_CANDIDATES};
use atelier_domain::{
    AgentId, DomainError, Idea, Phase, PipelineEvent, PromptCatalog, Report, ScoredIdea,
    SectionContent, SessionRequest, SessionState, StepPrompt, extract, parse_ideas,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that end a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Rejected before any agent ran; no event stream is opened.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// A provider call failed outright. Fatal; not retried.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The subscriber disconnected; remaining work was abandoned.
    #[error("session cancelled by subscriber")]
    Cancelled,
}

impl From<InvokeError> for SessionError {
    fn from(value: InvokeError) -> Self {
        match value {
            InvokeError::Gateway(e) => SessionError::Gateway(e),
            InvokeError::Cancelled(_) => SessionError::Cancelled,
        }
    }
}

impl From<ChannelClosed> for SessionError {
    fn from(_: ChannelClosed) -> Self {
        SessionError::Cancelled
    }
}

/// What a finished run produced, for programmatic callers. The same data
/// already went out on the event channel.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// Phase 1 ended on a candidate list; the caller must select.
    AwaitingSelection {
        ideas: Vec<Idea>,
        scores: Option<Vec<ScoredIdea>>,
        strategist_output: Option<String>,
        ideator_output: String,
    },
    /// Phase 1 ended without a selection step (idea generator disabled).
    Phase1Complete { strategist_output: Option<String> },
    /// Phase 2 ended on the assembled report.
    Completed { report: Report },
}

/// Use case for running one session
pub struct SessionOrchestrator {
    invoker: AgentInvoker,
}

impl SessionOrchestrator {
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self::with_transcript(gateway, Arc::new(NoTranscript))
    }

    pub fn with_transcript(
        gateway: Arc<dyn ProviderGateway>,
        transcript: Arc<dyn TranscriptLogger>,
    ) -> Self {
        Self {
            invoker: AgentInvoker::new(gateway, transcript),
        }
    }

    /// Execute the request, pushing events to `events` as they happen.
    ///
    /// Input errors are returned before the first event. Any later
    /// unrecoverable failure emits exactly one `error` event and leaves the
    /// session in the errored state. Cancellation (the subscriber dropped
    /// its receiver) emits nothing — there is no one left to tell.
    pub async fn run(
        &self,
        request: SessionRequest,
        events: EventSender,
    ) -> Result<SessionOutcome, SessionError> {
        request.validate()?;

        let state = SessionState::Idle.start(request.phase);
        info!(phase = request.phase.number(), "session started");

        let result = match request.phase {
            Phase::Ideation => self.run_ideation(&request, &events).await,
            Phase::Production => self.run_production(&request, &events).await,
        };

        match &result {
            Ok(outcome) => {
                let state = match outcome {
                    SessionOutcome::AwaitingSelection { .. } => state.await_selection(),
                    _ => state.complete(),
                };
                debug!(?state, "session finished");
            }
            Err(SessionError::Cancelled) => {
                debug!("session cancelled by subscriber");
            }
            Err(e) => {
                let state = state.fail();
                warn!(?state, "session failed: {}", e);
                // Best effort: the channel may already be gone.
                let _ = events
                    .send(PipelineEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
            }
        }

        result
    }

    /// Resolve the system instruction for an agent under this request.
    fn instruction(&self, request: &SessionRequest, agent: AgentId) -> String {
        PromptCatalog::resolve(
            agent,
            request.style_for(agent),
            &request.prompt_overrides,
            &request.prompt_presets,
        )
    }

    async fn run_ideation(
        &self,
        request: &SessionRequest,
        events: &EventSender,
    ) -> Result<SessionOutcome, SessionError> {
        events
            .send(PipelineEvent::status("Phase 1 — ideation started."))
            .await?;

        let mut strategist_output: Option<String> = None;
        if request.is_enabled(AgentId::Strategist) {
            let spec = CallSpec::for_agent(
                AgentId::Strategist,
                self.instruction(request, AgentId::Strategist),
            )
            .with_tools();
            let run = self
                .invoker
                .run_streamed(spec, &StepPrompt::strategist(&request.brief), events)
                .await?;
            strategist_output = Some(run.text);
        }

        if !request.is_enabled(AgentId::IdeaGenerator) {
            events
                .send(PipelineEvent::status(
                    "Phase 1 complete — idea generation disabled, no selection step.",
                ))
                .await?;
            return Ok(SessionOutcome::Phase1Complete { strategist_output });
        }

        if strategist_output.is_some() {
            events
                .send(PipelineEvent::handoff(
                    AgentId::Strategist,
                    AgentId::IdeaGenerator,
                    "strategic ground ready",
                ))
                .await?;
        }

        let spec = CallSpec::for_agent(
            AgentId::IdeaGenerator,
            self.instruction(request, AgentId::IdeaGenerator),
        );
        let user_message =
            StepPrompt::idea_generator(&request.brief, strategist_output.as_deref());
        let run = self.invoker.run_streamed(spec, &user_message, events).await?;
        let ideator_output = run.text;

        let candidates = parse_ideas(&ideator_output);
        debug!(count = candidates.len(), "idea candidates extracted");

        let (ideas, scores) = if candidates.len() > TOP_CANDIDATES {
            events
                .send(PipelineEvent::status(format!(
                    "Scoring {} candidates.",
                    candidates.len()
                )))
                .await?;
            let outcome = CandidateScorer::new(&self.invoker)
                .score(&request.brief, strategist_output.as_deref(), &candidates)
                .await?;
            let scores = (!outcome.scores.is_empty()).then_some(outcome.scores);
            (outcome.top, scores)
        } else {
            (candidates, None)
        };

        events
            .send(PipelineEvent::AwaitingSelection {
                ideas: ideas.clone(),
                scores: scores.clone(),
            })
            .await?;

        Ok(SessionOutcome::AwaitingSelection {
            ideas,
            scores,
            strategist_output,
            ideator_output,
        })
    }

    async fn run_production(
        &self,
        request: &SessionRequest,
        events: &EventSender,
    ) -> Result<SessionOutcome, SessionError> {
        events
            .send(PipelineEvent::status("Phase 2 — production started."))
            .await?;

        // Validated: phase 2 always carries a selection.
        let idea = Idea::from_selection(request.selected_idea.as_deref().unwrap_or_default());
        let strategist_ctx = request.strategist_output.as_deref();
        let brief = request.brief.as_str();

        let mut outputs: BTreeMap<AgentId, String> = BTreeMap::new();
        let mut previous: Option<AgentId> = None;

        for agent in AgentId::PHASE2 {
            if !request.is_enabled(agent) {
                continue;
            }

            if let Some(from) = previous {
                events
                    .send(PipelineEvent::handoff(from, agent, handoff_reason(agent)))
                    .await?;
            }

            let user_message = match agent {
                AgentId::Architect => StepPrompt::architect(brief, strategist_ctx, &idea),
                AgentId::Copywriter => StepPrompt::copywriter(brief, strategist_ctx, &idea),
                AgentId::Critic => StepPrompt::critic(
                    brief,
                    strategist_ctx,
                    &idea,
                    outputs.get(&AgentId::Architect).map(String::as_str),
                    outputs.get(&AgentId::Copywriter).map(String::as_str),
                ),
                AgentId::Finisher => {
                    let sections = accumulated_context(request, &outputs);
                    StepPrompt::finisher(brief, &idea, &sections)
                }
                _ => unreachable!("PHASE2 holds only production agents"),
            };

            let spec = CallSpec::for_agent(agent, self.instruction(request, agent));
            let run = self.invoker.run_streamed(spec, &user_message, events).await?;
            outputs.insert(agent, run.text);
            previous = Some(agent);
        }

        let mut report = assemble_report(request, &idea, &outputs);

        if let Some(confidence) = ConfidenceAuditor::new(&self.invoker)
            .audit(brief, &report)
            .await
        {
            report.confidence = Some(confidence);
        }

        events
            .send(PipelineEvent::Report {
                text: report.narrative(),
                data: Box::new(report.clone()),
            })
            .await?;

        Ok(SessionOutcome::Completed { report })
    }
}

/// Why control moves to this agent.
fn handoff_reason(to: AgentId) -> &'static str {
    match to {
        AgentId::Copywriter => "campaign plan ready for voice work",
        AgentId::Critic => "draft material ready for review",
        AgentId::Finisher => "all material ready for final assembly",
        _ => "previous step complete",
    }
}

/// The full accumulated context the finisher sees: only sections that ran,
/// in pipeline order, strategist carry-over first.
fn accumulated_context(
    request: &SessionRequest,
    outputs: &BTreeMap<AgentId, String>,
) -> Vec<(AgentId, String)> {
    let mut sections = Vec::new();
    if let Some(text) = &request.strategist_output {
        sections.push((AgentId::Strategist, text.clone()));
    }
    for agent in [AgentId::Architect, AgentId::Copywriter, AgentId::Critic] {
        if let Some(text) = outputs.get(&agent) {
            sections.push((agent, text.clone()));
        }
    }
    sections
}

/// Assemble the report from whichever steps ran.
///
/// The architect and finisher honour a JSON contract, so their sections are
/// parsed-or-raw; the copywriter and critic write prose and stay raw. A
/// failed parse always degrades to the raw text — never `None` when text
/// was produced.
fn assemble_report(
    request: &SessionRequest,
    idea: &Idea,
    outputs: &BTreeMap<AgentId, String>,
) -> Report {
    let mut report = Report::new(Some(idea.clone()));

    if let Some(text) = &request.strategist_output {
        report.set_section(AgentId::Strategist, SectionContent::Text(text.clone()));
    }

    for (&agent, text) in outputs {
        let content = match agent {
            AgentId::Architect | AgentId::Finisher => {
                SectionContent::from_output(text, extract::<serde_json::Value>(text, true))
            }
            _ => SectionContent::Text(text.clone()),
        };
        report.set_section(agent, content);
    }

    report
}
