//! Agent identities and their static configuration.
//!
//! An [`AgentId`] is one role in the pipeline, bound to a provider call and
//! an instruction variant. The enumeration is fixed: six user-selectable
//! agents plus two internal ones (scorer, auditor) that never appear in a
//! request's enabled set and never produce stream events.

use crate::session::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One role in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// Opens phase 1. The only phase-1 agent with search grounding.
    Strategist,
    /// Produces the candidate list phase 1 ends on.
    IdeaGenerator,
    Architect,
    Copywriter,
    /// Reviews the architect's and copywriter's raw output.
    Critic,
    /// Closes phase 2 from the full accumulated context.
    Finisher,
    /// Internal: ranks idea candidates. Never user-selectable.
    Scorer,
    /// Internal: re-scores the assembled report. Never user-selectable.
    Auditor,
}

impl AgentId {
    /// User-selectable phase-1 agents, in invocation order.
    pub const PHASE1: [AgentId; 2] = [AgentId::Strategist, AgentId::IdeaGenerator];

    /// User-selectable phase-2 agents, in invocation order.
    pub const PHASE2: [AgentId; 4] = [
        AgentId::Architect,
        AgentId::Copywriter,
        AgentId::Critic,
        AgentId::Finisher,
    ];

    /// The five report sections, in assembly order.
    pub const SECTIONS: [AgentId; 5] = [
        AgentId::Strategist,
        AgentId::Architect,
        AgentId::Copywriter,
        AgentId::Critic,
        AgentId::Finisher,
    ];

    /// Human display label.
    pub fn label(&self) -> &'static str {
        match self {
            AgentId::Strategist => "Brand Strategist",
            AgentId::IdeaGenerator => "Idea Generator",
            AgentId::Architect => "Campaign Architect",
            AgentId::Copywriter => "Copywriter",
            AgentId::Critic => "Critic",
            AgentId::Finisher => "Finisher",
            AgentId::Scorer => "Candidate Scorer",
            AgentId::Auditor => "Confidence Auditor",
        }
    }

    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Strategist => "strategist",
            AgentId::IdeaGenerator => "idea_generator",
            AgentId::Architect => "architect",
            AgentId::Copywriter => "copywriter",
            AgentId::Critic => "critic",
            AgentId::Finisher => "finisher",
            AgentId::Scorer => "scorer",
            AgentId::Auditor => "auditor",
        }
    }

    /// Internal agents run silently and cannot be enabled or disabled.
    pub fn is_internal(&self) -> bool {
        matches!(self, AgentId::Scorer | AgentId::Auditor)
    }

    /// Agents a caller may put in a request's enabled set.
    pub fn user_selectable() -> impl Iterator<Item = AgentId> {
        AgentId::PHASE1.into_iter().chain(AgentId::PHASE2)
    }

    /// The user-selectable agents that belong to a phase.
    pub fn for_phase(phase: Phase) -> &'static [AgentId] {
        match phase {
            Phase::Ideation => &AgentId::PHASE1,
            Phase::Production => &AgentId::PHASE2,
        }
    }

    /// Maximum provider output per call, in tokens.
    ///
    /// A cost control, not a correctness requirement: long-form roles get a
    /// larger bound, short roles a smaller one. Exceeding it truncates the
    /// provider's own output.
    pub fn max_output_tokens(&self) -> u32 {
        match self {
            AgentId::Strategist => 4096,
            AgentId::IdeaGenerator => 4096,
            AgentId::Architect => 8192,
            AgentId::Copywriter => 8192,
            AgentId::Critic => 4096,
            AgentId::Finisher => 8192,
            AgentId::Scorer => 1024,
            AgentId::Auditor => 2048,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "strategist" => Ok(AgentId::Strategist),
            "idea_generator" | "ideator" => Ok(AgentId::IdeaGenerator),
            "architect" => Ok(AgentId::Architect),
            "copywriter" => Ok(AgentId::Copywriter),
            "critic" => Ok(AgentId::Critic),
            "finisher" => Ok(AgentId::Finisher),
            "scorer" => Ok(AgentId::Scorer),
            "auditor" => Ok(AgentId::Auditor),
            other => Err(format!("unknown agent: {}", other)),
        }
    }
}

/// One of the three fixed instruction variants every agent carries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PromptStyle {
    /// House style, the default agency voice.
    #[default]
    #[serde(rename = "style-a")]
    StyleA,
    /// Disruptive: bolder, riskier angles.
    #[serde(rename = "style-b")]
    StyleB,
    /// Pragmatic: execution-first, budget-aware.
    #[serde(rename = "style-c")]
    StyleC,
}

impl PromptStyle {
    pub const ALL: [PromptStyle; 3] =
        [PromptStyle::StyleA, PromptStyle::StyleB, PromptStyle::StyleC];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::StyleA => "style-a",
            PromptStyle::StyleB => "style-b",
            PromptStyle::StyleC => "style-c",
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "style-a" | "a" => Ok(PromptStyle::StyleA),
            "style-b" | "b" => Ok(PromptStyle::StyleB),
            "style-c" | "c" => Ok(PromptStyle::StyleC),
            other => Err(format!("unknown style: {}", other)),
        }
    }
}
