//! Live event rendering
//!
//! The renderer is the transport end of the event channel: it prints each
//! event as it arrives, streaming agent text chunk by chunk.

use crate::cli::commands::OutputFormat;
use crate::output::formatter::ConsoleFormatter;
use atelier_domain::PipelineEvent;
use colored::Colorize;
use std::io::Write;

/// Prints pipeline events as they arrive.
pub struct EventRenderer {
    format: OutputFormat,
    quiet: bool,
}

impl EventRenderer {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Render one event.
    pub fn render(&self, event: &PipelineEvent) {
        match self.format {
            OutputFormat::Json => {
                if let Ok(line) = serde_json::to_string(event) {
                    println!("{}", line);
                }
            }
            OutputFormat::Full => self.render_full(event),
        }
    }

    fn render_full(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Orchestrator { text } => {
                if !self.quiet {
                    eprintln!("{}", format!("* {}", text).dimmed());
                }
            }
            PipelineEvent::Handoff { from, to, reason } => {
                if !self.quiet {
                    eprintln!(
                        "{}",
                        format!("* {} -> {}: {}", from, to, reason).dimmed()
                    );
                }
            }
            PipelineEvent::AgentStart { agent } => {
                println!("\n{}", format!("── {} ──", agent.label()).yellow().bold());
            }
            PipelineEvent::AgentChunk { text, .. } => {
                print!("{}", text);
                let _ = std::io::stdout().flush();
            }
            PipelineEvent::AgentDone { .. } => {
                println!();
            }
            PipelineEvent::AwaitingSelection { ideas, scores } => {
                println!(
                    "{}",
                    ConsoleFormatter::format_selection(ideas, scores.as_deref())
                );
            }
            PipelineEvent::Report { data, .. } => {
                println!("{}", ConsoleFormatter::format_report(data));
            }
            PipelineEvent::Error { message } => {
                eprintln!("\n{} {}", "Error:".red().bold(), message);
            }
        }
    }
}
