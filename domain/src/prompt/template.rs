//! User-message templates for each pipeline step.

use crate::agent::AgentId;
use crate::idea::Idea;

/// Builders for the per-step user messages.
///
/// System instructions come from the [`PromptCatalog`](crate::prompt::catalog::PromptCatalog);
/// these templates carry the request-specific context each step needs.
pub struct StepPrompt;

impl StepPrompt {
    /// Phase 1, step 1: the strategist only sees the brief.
    pub fn strategist(brief: &str) -> String {
        format!(
            r#"## Brief

{brief}

Lay out the strategic ground for this campaign."#
        )
    }

    /// Phase 1, step 2: the idea generator sees the brief and, when the
    /// strategist ran, its full text as context.
    pub fn idea_generator(brief: &str, strategist: Option<&str>) -> String {
        let context = strategist
            .map(|text| format!("\n## Strategist's notes\n\n{text}\n"))
            .unwrap_or_default();

        format!(
            r#"## Brief

{brief}
{context}
Produce your campaign idea candidates now."#
        )
    }

    /// Phase 2 shared context: brief, strategist carry-over, selected idea.
    fn production_context(brief: &str, strategist: Option<&str>, idea: &Idea) -> String {
        let strategist = strategist
            .map(|text| format!("\n## Strategist's notes\n\n{text}\n"))
            .unwrap_or_default();

        format!(
            r#"## Brief

{brief}
{strategist}
## Selected idea

{title}

{body}"#,
            title = idea.title,
            body = idea.body,
        )
    }

    /// Phase 2, step 1.
    pub fn architect(brief: &str, strategist: Option<&str>, idea: &Idea) -> String {
        format!(
            "{}\n\nDesign the campaign for this idea.",
            Self::production_context(brief, strategist, idea)
        )
    }

    /// Phase 2, step 2.
    pub fn copywriter(brief: &str, strategist: Option<&str>, idea: &Idea) -> String {
        format!(
            "{}\n\nWrite the campaign voice for this idea.",
            Self::production_context(brief, strategist, idea)
        )
    }

    /// Phase 2, step 3: the critic also receives the raw output of the
    /// architect and copywriter steps that actually ran.
    pub fn critic(
        brief: &str,
        strategist: Option<&str>,
        idea: &Idea,
        architect: Option<&str>,
        copywriter: Option<&str>,
    ) -> String {
        let mut prompt = Self::production_context(brief, strategist, idea);

        if let Some(text) = architect {
            prompt.push_str(&format!("\n\n## Architect's plan\n\n{text}"));
        }
        if let Some(text) = copywriter {
            prompt.push_str(&format!("\n\n## Copywriter's voice\n\n{text}"));
        }

        prompt.push_str("\n\nReview the work above against the brief and the selected idea.");
        prompt
    }

    /// Phase 2, step 4: the finisher receives the full accumulated context —
    /// only the sections that actually ran, joined with explicit separators.
    pub fn finisher(brief: &str, idea: &Idea, sections: &[(AgentId, String)]) -> String {
        let mut prompt = format!(
            r#"## Brief

{brief}

## Selected idea

{title}

{body}"#,
            title = idea.title,
            body = idea.body,
        );

        for (agent, text) in sections {
            prompt.push_str(&format!("\n\n--- {} ---\n\n{}", agent.label(), text));
        }

        prompt.push_str("\n\nAssemble the final campaign dossier.");
        prompt
    }

    /// Scorer input: candidates with their explicit indices, as JSON.
    pub fn scorer(brief: &str, prior_context: Option<&str>, candidates: &[Idea]) -> String {
        let listing = candidates
            .iter()
            .enumerate()
            .map(|(index, idea)| {
                serde_json::json!({
                    "index": index,
                    "title": idea.title,
                    "body": idea.body,
                })
                .to_string()
            })
            .collect::<Vec<_>>()
            .join(",\n  ");

        let context = prior_context
            .map(|text| format!("\n## Strategic context\n\n{text}\n"))
            .unwrap_or_default();

        format!(
            r#"## Brief

{brief}
{context}
## Candidates

[
  {listing}
]

Score every candidate."#
        )
    }

    /// Auditor input: each present report section flattened to plain text.
    pub fn auditor(brief: &str, sections: &[(AgentId, String)]) -> String {
        let mut prompt = format!("## Brief\n\n{brief}\n\n## Report sections");

        for (agent, text) in sections {
            prompt.push_str(&format!("\n\n### {}\n\n{}", agent.as_str(), text));
        }

        prompt.push_str("\n\nAudit every section above.");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea() -> Idea {
        Idea::new("Racines urbaines", "Un pop-up éphémère dans trois villes.")
    }

    #[test]
    fn strategist_prompt_contains_brief() {
        let prompt = StepPrompt::strategist("Reposition a furniture brand");
        assert!(prompt.contains("Reposition a furniture brand"));
    }

    #[test]
    fn idea_generator_includes_context_only_when_present() {
        let with = StepPrompt::idea_generator("brief", Some("strategy text"));
        assert!(with.contains("Strategist's notes"));
        assert!(with.contains("strategy text"));

        let without = StepPrompt::idea_generator("brief", None);
        assert!(!without.contains("Strategist's notes"));
    }

    #[test]
    fn critic_sees_prior_raw_output() {
        let prompt = StepPrompt::critic(
            "brief",
            None,
            &idea(),
            Some("plan text"),
            Some("voice text"),
        );
        assert!(prompt.contains("Architect's plan"));
        assert!(prompt.contains("plan text"));
        assert!(prompt.contains("Copywriter's voice"));
        assert!(prompt.contains("voice text"));
    }

    #[test]
    fn finisher_joins_sections_with_separators() {
        let sections = vec![
            (AgentId::Architect, "plan".to_string()),
            (AgentId::Critic, "critique".to_string()),
        ];
        let prompt = StepPrompt::finisher("brief", &idea(), &sections);
        assert!(prompt.contains("--- Campaign Architect ---"));
        assert!(prompt.contains("--- Critic ---"));
        assert!(!prompt.contains("Copywriter"));
    }

    #[test]
    fn scorer_lists_candidates_with_indices() {
        let candidates = vec![Idea::new("A", "a"), Idea::new("B", "b")];
        let prompt = StepPrompt::scorer("brief", Some("context"), &candidates);
        assert!(prompt.contains("\"index\":0"));
        assert!(prompt.contains("\"index\":1"));
        assert!(prompt.contains("Strategic context"));
    }

    #[test]
    fn auditor_lists_sections_by_wire_name() {
        let sections = vec![
            (AgentId::Strategist, "s".to_string()),
            (AgentId::Architect, "a".to_string()),
        ];
        let prompt = StepPrompt::auditor("brief", &sections);
        assert!(prompt.contains("### strategist"));
        assert!(prompt.contains("### architect"));
    }
}
