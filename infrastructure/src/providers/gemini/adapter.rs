//! Gemini provider adapter
//!
//! Implements [`ProviderGateway`] over the Gemini HTTP API. Credentials are
//! read from the environment once at construction; a missing key is an
//! input error surfaced before any pipeline work starts.

use super::session::GeminiSession;
use crate::config::ProviderConfig;
use async_trait::async_trait;
use atelier_application::{CallSpec, GatewayError, ProviderGateway, ProviderSession};
use std::time::Duration;
use tracing::info;

pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
}

impl GeminiGateway {
    /// Create a gateway from configuration.
    ///
    /// Fails when the configured API key variable is unset or empty.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingCredentials(config.api_key_env.clone()))?;

        info!(model = %config.model, "Gemini provider initialized");

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }
}

#[async_trait]
impl ProviderGateway for GeminiGateway {
    async fn open(&self, spec: CallSpec) -> Result<Box<dyn ProviderSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            self.client.clone(),
            self.base_url.clone(),
            self.api_key.clone(),
            self.model.clone(),
            self.timeout,
            spec,
        )))
    }
}
