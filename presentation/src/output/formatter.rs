//! Formatting for selections and reports

use atelier_domain::{AgentId, Idea, Report, ScoredIdea};
use colored::Colorize;

/// Formats pipeline artifacts for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the phase-1 candidate list, with scores when present.
    pub fn format_selection(ideas: &[Idea], scores: Option<&[ScoredIdea]>) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\n{}\n",
            "Select an idea to continue into phase 2:".cyan().bold()
        ));

        for (position, idea) in ideas.iter().enumerate() {
            let verdict = scores
                .and_then(|scores| scores.get(position))
                .map(|scored| {
                    let flags = if scored.flags.is_empty() {
                        String::new()
                    } else {
                        format!("  [{}]", scored.flags.join(", "))
                    };
                    format!("  ({}/100){}", scored.total, flags)
                })
                .unwrap_or_default();

            output.push_str(&format!(
                "\n{}{}\n{}\n",
                format!("{}. {}", position + 1, idea.title).yellow().bold(),
                verdict.dimmed(),
                idea.body
            ));
        }

        output
    }

    /// Format the final report for console display.
    pub fn format_report(report: &Report) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Campaign Report"));

        if let Some(idea) = &report.selected_idea {
            output.push_str(&format!(
                "\n{} {}\n",
                "Selected idea:".cyan().bold(),
                idea.title
            ));
        }

        for (agent, content) in report.sections() {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", agent.label()).yellow().bold(),
                content.as_plain_text().trim_end()
            ));
        }

        if let Some(confidence) = &report.confidence {
            output.push_str(&format!("\n{}\n", "Confidence:".cyan().bold()));
            for agent in AgentId::SECTIONS {
                if let Some(entry) = confidence.get(&agent) {
                    let flags = if entry.flags.is_empty() {
                        String::new()
                    } else {
                        format!("  [{}]", entry.flags.join(", "))
                    };
                    output.push_str(&format!(
                        "  {:<20} {:>3}/100{}\n",
                        agent.label(),
                        entry.score,
                        flags
                    ));
                    if let Some(fact_check) = &entry.fact_check {
                        output.push_str(&format!("  {:<20} {}\n", "", fact_check.dimmed()));
                    }
                }
            }
        }

        output
    }

    /// Format the report as pretty JSON.
    pub fn format_report_json(report: &Report) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        format!(
            "\n{}\n{}\n",
            title.cyan().bold(),
            "=".repeat(title.len()).cyan()
        )
    }
}
