//! The terminal artifact of phase 2.

use crate::agent::AgentId;
use crate::idea::Idea;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema tag stamped on every report.
pub const REPORT_SCHEMA_VERSION: &str = "2";

/// One report section: a parsed value when the agent honoured its JSON
/// contract, the raw text otherwise.
///
/// A failed parse always degrades to `Text` — a corrupted structured value
/// is never exposed as if it were well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    Structured(serde_json::Value),
}

impl SectionContent {
    /// Classify agent output: objects and arrays count as structured,
    /// everything else stays raw text.
    pub fn from_output(text: &str, parsed: Option<serde_json::Value>) -> Self {
        match parsed {
            Some(value) if value.is_object() || value.is_array() => {
                SectionContent::Structured(value)
            }
            _ => SectionContent::Text(text.to_string()),
        }
    }

    /// Flatten to plain text for agent consumption and display.
    pub fn as_plain_text(&self) -> String {
        match self {
            SectionContent::Text(text) => text.clone(),
            SectionContent::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Per-section verdict from the confidence auditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceEntry {
    /// Density/coherence score, 0–100.
    pub score: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Natural-language summary of the fact-check outcome. Only the
    /// strategist and architect sections carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<String>,
}

/// Map from section agent to its audit verdict.
pub type ConfidenceMap = BTreeMap<AgentId, ConfidenceEntry>;

/// The assembled campaign report.
///
/// Built incrementally as each phase-2 agent finishes; finalized only after
/// the confidence auditor resolves one way or the other. Disabled steps
/// leave their field `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_idea: Option<Idea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategist: Option<SectionContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architect: Option<SectionContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copywriter: Option<SectionContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critic: Option<SectionContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finisher: Option<SectionContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceMap>,
}

impl Report {
    pub fn new(selected_idea: Option<Idea>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            selected_idea,
            strategist: None,
            architect: None,
            copywriter: None,
            critic: None,
            finisher: None,
            confidence: None,
        }
    }

    /// Store a section. Only the five section agents have a slot;
    /// anything else is ignored.
    pub fn set_section(&mut self, agent: AgentId, content: SectionContent) {
        match agent {
            AgentId::Strategist => self.strategist = Some(content),
            AgentId::Architect => self.architect = Some(content),
            AgentId::Copywriter => self.copywriter = Some(content),
            AgentId::Critic => self.critic = Some(content),
            AgentId::Finisher => self.finisher = Some(content),
            _ => {}
        }
    }

    pub fn section(&self, agent: AgentId) -> Option<&SectionContent> {
        match agent {
            AgentId::Strategist => self.strategist.as_ref(),
            AgentId::Architect => self.architect.as_ref(),
            AgentId::Copywriter => self.copywriter.as_ref(),
            AgentId::Critic => self.critic.as_ref(),
            AgentId::Finisher => self.finisher.as_ref(),
            _ => None,
        }
    }

    /// Present sections in assembly order.
    pub fn sections(&self) -> impl Iterator<Item = (AgentId, &SectionContent)> {
        AgentId::SECTIONS
            .into_iter()
            .filter_map(|agent| self.section(agent).map(|content| (agent, content)))
    }

    /// Human-readable concatenation of all section texts, carried next to
    /// the structured data in the final `report` event.
    pub fn narrative(&self) -> String {
        let mut out = String::new();
        if let Some(idea) = &self.selected_idea {
            out.push_str(&format!("Selected idea: {}\n", idea.title));
        }
        for (agent, content) in self.sections() {
            out.push_str(&format!(
                "\n=== {} ===\n{}\n",
                agent.label(),
                content.as_plain_text().trim_end()
            ));
        }
        out
    }
}
