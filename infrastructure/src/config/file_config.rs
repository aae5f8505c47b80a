//! Raw configuration from TOML

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration file
///
/// # Example
///
/// ```toml
/// [provider]
/// model = "gemini-2.5-flash"
/// api_key_env = "GEMINI_API_KEY"
/// timeout_secs = 120
///
/// [transcript]
/// enabled = true
/// path = ".atelier/transcript.jsonl"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: ProviderConfig,
    pub transcript: TranscriptConfig,
}

/// `[provider]` section: the generative-text provider endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Environment variable holding the API key. The key itself never
    /// lives in a config file.
    pub api_key_env: String,
    /// API base URL.
    pub base_url: String,
    /// Optional per-call timeout in seconds. Applies to every provider
    /// request, including each streamed read. Unset means no timeout,
    /// matching the reference behavior.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: None,
        }
    }
}

/// `[transcript]` section: best-effort JSONL record of agent runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub enabled: bool,
    /// Target file. Defaults to `.atelier/transcript.jsonl` when enabled.
    pub path: Option<PathBuf>,
}

impl TranscriptConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(".atelier/transcript.jsonl"))
    }
}
