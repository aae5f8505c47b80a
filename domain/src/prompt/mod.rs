//! Prompt configuration and user-message templates.
//!
//! [`catalog`] owns the built-in instruction table (agent × style) and the
//! precedence function that resolves it against caller overrides.
//! [`template`] builds the per-step user messages.

pub mod catalog;
pub mod template;

pub use catalog::PromptCatalog;
pub use template::StepPrompt;
