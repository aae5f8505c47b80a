//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the event stream and final artifacts
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Live formatted output with streamed agent text
    Full,
    /// One JSON object per event, for machine consumption
    Json,
}

/// CLI arguments for atelier
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(author, version, about = "Creative studio pipeline - cooperating agents, streamed")]
#[command(long_about = r#"
Atelier drives a pipeline of cooperating agents over a campaign brief and
streams their output as it is generated.

Phase 1 (ideation): the strategist lays the ground, the idea generator
produces candidates, and - above five candidates - an internal scorer keeps
the top five. The run ends on a selection prompt.

Phase 2 (production): architect, copywriter, critic and finisher build the
campaign from the selected idea; an internal auditor re-scores the final
report. The run ends on the report.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./atelier.toml      Project-level config
3. ~/.config/atelier/config.toml   Global config

Example:
  atelier "Reposition a heritage furniture brand for urban millennials"
  atelier --phase 2 --request selection.toml
  atelier agents
"#)]
pub struct Cli {
    /// The campaign brief (or use a request file)
    pub brief: Option<String>,

    /// Pipeline phase: 1 = ideation, 2 = production
    #[arg(short, long, default_value_t = 1)]
    pub phase: u8,

    /// Enabled agents (repeatable; default: all phase-appropriate agents)
    #[arg(short, long = "agent", value_name = "AGENT")]
    pub agents: Vec<String>,

    /// Style selector per agent, e.g. --style copywriter=style-b
    #[arg(long = "style", value_name = "AGENT=STYLE")]
    pub styles: Vec<String>,

    /// Request file with overrides, presets, and phase-2 carry-over
    #[arg(short, long, value_name = "PATH")]
    pub request: Option<PathBuf>,

    /// Selected idea for phase 2, as "title\n\nbody"
    #[arg(long, value_name = "TEXT")]
    pub idea: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress status lines, print agent text only
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every agent's display name and built-in style instructions
    Agents,
}
