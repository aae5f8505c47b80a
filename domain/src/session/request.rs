//! The immutable input to one pipeline run.

use crate::agent::{AgentId, PromptStyle};
use crate::core::error::DomainError;
use std::collections::{BTreeMap, BTreeSet};

/// One of the two caller-visible stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Phase 1: strategist + idea generator, ends on candidate selection.
    #[default]
    Ideation,
    /// Phase 2: architect through finisher, ends on the report.
    Production,
}

impl Phase {
    /// Caller-facing phase number (`1` or `2`).
    pub fn number(&self) -> u8 {
        match self {
            Phase::Ideation => 1,
            Phase::Production => 2,
        }
    }
}

impl TryFrom<u8> for Phase {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Phase::Ideation),
            2 => Ok(Phase::Production),
            other => Err(DomainError::InvalidPhase(other)),
        }
    }
}

/// Immutable input to one pipeline run.
///
/// Created once per inbound request and owned by the orchestrator for the
/// request's lifetime. Selection between the two phases happens out-of-band:
/// a phase-2 request carries the phase-1 outputs back in serialized form.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Free-text brief. Must be non-empty.
    pub brief: String,
    /// Which phase this run executes.
    pub phase: Phase,
    /// Enabled agent identities. Defaults to all phase-appropriate agents.
    pub enabled: BTreeSet<AgentId>,
    /// Per-agent style selector. Missing entries default to [`PromptStyle::StyleA`].
    pub styles: BTreeMap<AgentId, PromptStyle>,
    /// Per-agent full instruction override (highest precedence).
    pub prompt_overrides: BTreeMap<AgentId, String>,
    /// Caller-supplied preset tables overriding all three variants of an agent.
    pub prompt_presets: BTreeMap<AgentId, BTreeMap<PromptStyle, String>>,
    /// Phase 2 only: the caller-selected idea, as `"title\n\nbody"`.
    pub selected_idea: Option<String>,
    /// Phase 2 only: phase-1 strategist text, verbatim.
    pub strategist_output: Option<String>,
    /// Phase 2 only: phase-1 idea-generator text, verbatim (context continuity).
    pub ideator_output: Option<String>,
}

impl SessionRequest {
    /// Create a phase-1 request with all phase-1 agents enabled.
    pub fn new(brief: impl Into<String>) -> Self {
        Self::for_phase(brief, Phase::Ideation)
    }

    /// Create a request for the given phase with all phase-appropriate
    /// agents enabled.
    pub fn for_phase(brief: impl Into<String>, phase: Phase) -> Self {
        Self {
            brief: brief.into(),
            phase,
            enabled: AgentId::for_phase(phase).iter().copied().collect(),
            styles: BTreeMap::new(),
            prompt_overrides: BTreeMap::new(),
            prompt_presets: BTreeMap::new(),
            selected_idea: None,
            strategist_output: None,
            ideator_output: None,
        }
    }

    /// Replace the enabled set. Internal agents are rejected at validation.
    pub fn with_enabled(mut self, agents: impl IntoIterator<Item = AgentId>) -> Self {
        self.enabled = agents.into_iter().collect();
        self
    }

    pub fn with_style(mut self, agent: AgentId, style: PromptStyle) -> Self {
        self.styles.insert(agent, style);
        self
    }

    pub fn with_prompt_override(mut self, agent: AgentId, instruction: impl Into<String>) -> Self {
        self.prompt_overrides.insert(agent, instruction.into());
        self
    }

    pub fn with_preset(
        mut self,
        agent: AgentId,
        presets: BTreeMap<PromptStyle, String>,
    ) -> Self {
        self.prompt_presets.insert(agent, presets);
        self
    }

    /// Attach the phase-1 carry-over a phase-2 run needs.
    pub fn with_selection(
        mut self,
        selected_idea: impl Into<String>,
        strategist_output: Option<String>,
        ideator_output: Option<String>,
    ) -> Self {
        self.selected_idea = Some(selected_idea.into());
        self.strategist_output = strategist_output;
        self.ideator_output = ideator_output;
        self
    }

    /// Whether a user-selectable agent participates in this run.
    pub fn is_enabled(&self, agent: AgentId) -> bool {
        self.enabled.contains(&agent)
    }

    /// The style selected for an agent, defaulting to style-a.
    pub fn style_for(&self, agent: AgentId) -> PromptStyle {
        self.styles.get(&agent).copied().unwrap_or_default()
    }

    /// Reject invalid requests before any agent runs.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.brief.trim().is_empty() {
            return Err(DomainError::EmptyBrief);
        }
        if let Some(internal) = self.enabled.iter().find(|a| a.is_internal()) {
            return Err(DomainError::InternalAgent(internal.to_string()));
        }
        if self.phase == Phase::Production {
            match &self.selected_idea {
                Some(idea) if !idea.trim().is_empty() => {}
                _ => return Err(DomainError::MissingSelection),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_phase_agents() {
        let request = SessionRequest::new("Reposition a furniture brand");
        assert!(request.is_enabled(AgentId::Strategist));
        assert!(request.is_enabled(AgentId::IdeaGenerator));
        assert!(!request.is_enabled(AgentId::Architect));

        let request = SessionRequest::for_phase("brief", Phase::Production);
        assert!(request.is_enabled(AgentId::Finisher));
        assert!(!request.is_enabled(AgentId::Strategist));
    }

    #[test]
    fn blank_brief_is_rejected() {
        let request = SessionRequest::new("   ");
        assert_eq!(request.validate(), Err(DomainError::EmptyBrief));
    }

    #[test]
    fn internal_agents_cannot_be_enabled() {
        let request = SessionRequest::new("brief").with_enabled([AgentId::Scorer]);
        assert!(matches!(
            request.validate(),
            Err(DomainError::InternalAgent(_))
        ));
    }

    #[test]
    fn production_requires_a_selection() {
        let request = SessionRequest::for_phase("brief", Phase::Production);
        assert_eq!(request.validate(), Err(DomainError::MissingSelection));

        let request = request.with_selection("Title\n\nBody", None, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn style_defaults_to_a() {
        let request =
            SessionRequest::new("brief").with_style(AgentId::Copywriter, PromptStyle::StyleC);
        assert_eq!(request.style_for(AgentId::Copywriter), PromptStyle::StyleC);
        assert_eq!(request.style_for(AgentId::Strategist), PromptStyle::StyleA);
    }

    #[test]
    fn phase_numbers() {
        assert_eq!(Phase::Ideation.number(), 1);
        assert_eq!(Phase::try_from(2).unwrap(), Phase::Production);
        assert!(Phase::try_from(3).is_err());
    }
}
