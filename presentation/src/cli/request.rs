//! Building a [`SessionRequest`] from CLI arguments and a request file.
//!
//! The request file carries everything that is unwieldy as flags: prompt
//! overrides, preset tables, and the phase-2 carry-over texts. Flags win
//! over file values.

use super::commands::Cli;
use atelier_domain::{AgentId, DomainError, Phase, PromptStyle, SessionRequest};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors while assembling the request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("cannot read request file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("a brief is required (argument or request file)")]
    MissingBrief,

    #[error("invalid --style value '{0}', expected AGENT=STYLE")]
    MalformedStyle(String),
}

/// Request file shape (TOML).
///
/// ```toml
/// brief = "Reposition a heritage furniture brand"
/// phase = 2
/// agents = ["architect", "copywriter", "finisher"]
/// selected_idea = "Racines urbaines\n\nUn pop-up éphémère."
/// strategist_output = "..."
/// ideator_output = "..."
///
/// [styles]
/// copywriter = "style-b"
///
/// [prompts]
/// critic = "Full override of the critic's instruction."
///
/// [presets.architect]
/// style-a = "..."
/// style-b = "..."
/// style-c = "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestFile {
    pub brief: Option<String>,
    pub phase: Option<u8>,
    pub agents: Option<Vec<String>>,
    pub styles: BTreeMap<String, String>,
    pub prompts: BTreeMap<String, String>,
    pub presets: BTreeMap<String, BTreeMap<String, String>>,
    pub selected_idea: Option<String>,
    pub strategist_output: Option<String>,
    pub ideator_output: Option<String>,
}

impl RequestFile {
    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

fn parse_agent(name: &str) -> Result<AgentId, RequestError> {
    name.parse()
        .map_err(|_| DomainError::UnknownAgent(name.to_string()).into())
}

fn parse_style(name: &str) -> Result<PromptStyle, RequestError> {
    name.parse()
        .map_err(|_| DomainError::UnknownStyle(name.to_string()).into())
}

/// Merge CLI arguments over the request file into a [`SessionRequest`].
pub fn build_request(cli: &Cli) -> Result<SessionRequest, RequestError> {
    let file = match &cli.request {
        Some(path) => RequestFile::load(path)?,
        None => RequestFile::default(),
    };

    let brief = cli
        .brief
        .clone()
        .or(file.brief)
        .ok_or(RequestError::MissingBrief)?;

    let phase_number = if cli.phase != 1 {
        cli.phase
    } else {
        file.phase.unwrap_or(cli.phase)
    };
    let phase = Phase::try_from(phase_number).map_err(DomainError::from)?;

    let mut request = SessionRequest::for_phase(brief, phase);

    let agent_names = if cli.agents.is_empty() {
        file.agents.unwrap_or_default()
    } else {
        cli.agents.clone()
    };
    if !agent_names.is_empty() {
        let agents = agent_names
            .iter()
            .map(|name| parse_agent(name))
            .collect::<Result<Vec<_>, _>>()?;
        request = request.with_enabled(agents);
    }

    for (name, style) in &file.styles {
        request = request.with_style(parse_agent(name)?, parse_style(style)?);
    }
    for entry in &cli.styles {
        let (name, style) = entry
            .split_once('=')
            .ok_or_else(|| RequestError::MalformedStyle(entry.clone()))?;
        request = request.with_style(parse_agent(name)?, parse_style(style)?);
    }

    for (name, instruction) in &file.prompts {
        request = request.with_prompt_override(parse_agent(name)?, instruction.clone());
    }

    for (name, table) in &file.presets {
        let agent = parse_agent(name)?;
        let mut presets = BTreeMap::new();
        for (style, instruction) in table {
            presets.insert(parse_style(style)?, instruction.clone());
        }
        request = request.with_preset(agent, presets);
    }

    let selected_idea = cli.idea.clone().or(file.selected_idea);
    if let Some(idea) = selected_idea {
        request = request.with_selection(idea, file.strategist_output, file.ideator_output);
    }

    Ok(request)
}
