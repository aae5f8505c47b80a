//! Read-only agent catalog.
//!
//! Consumed by the external UI for display and prompt editing only; it does
//! not participate in pipeline execution.

use atelier_domain::{AgentId, PromptCatalog, PromptStyle};
use serde::Serialize;
use std::collections::BTreeMap;

/// One user-selectable agent: display name plus its three built-in
/// instruction variants.
#[derive(Debug, Clone, Serialize)]
pub struct AgentCatalogEntry {
    pub id: AgentId,
    pub label: String,
    pub styles: BTreeMap<PromptStyle, String>,
}

/// The full catalog, in pipeline order. Internal agents are excluded.
pub fn agent_catalog() -> Vec<AgentCatalogEntry> {
    AgentId::user_selectable()
        .map(|agent| AgentCatalogEntry {
            id: agent,
            label: agent.label().to_string(),
            styles: PromptStyle::ALL
                .into_iter()
                .map(|style| (style, PromptCatalog::builtin(agent, style).to_string()))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_six_agents_with_three_styles_each() {
        let catalog = agent_catalog();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.iter().all(|entry| entry.styles.len() == 3));
        assert!(!catalog.iter().any(|entry| entry.id.is_internal()));
    }

    #[test]
    fn catalog_serializes_with_style_keys() {
        let json = serde_json::to_value(agent_catalog()).unwrap();
        assert_eq!(json[0]["id"], "strategist");
        assert!(json[0]["styles"].get("style-b").is_some());
    }
}
