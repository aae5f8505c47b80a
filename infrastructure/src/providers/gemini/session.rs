//! Gemini provider session
//!
//! One session wraps one call. Streaming goes through the
//! `streamGenerateContent` SSE endpoint; the scorer and auditor use the
//! plain `generateContent` endpoint via [`ProviderSession::send`].

use super::types;
use async_trait::async_trait;
use atelier_application::{CallSpec, Completion, GatewayError, ProviderSession, StreamHandle};
use atelier_domain::{ProviderEvent, TokenUsage};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct GeminiSession {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
    spec: CallSpec,
}

impl GeminiSession {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
        spec: CallSpec,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
            timeout,
            spec,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            self.model,
            method
        )
    }

    /// Wrap a future in the configured per-call timeout, if any.
    async fn bounded<T, F>(&self, future: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| GatewayError::Timeout)?,
            None => future.await,
        }
    }

    async fn post(
        &self,
        method: &str,
        query: &[(&str, &str)],
        user_message: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        let body = types::build_request(&self.spec, user_message);
        let response = self
            .client
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{} returned {}: {}",
                method,
                status,
                truncate(&detail, 300)
            )));
        }
        Ok(response)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let cut = text
            .char_indices()
            .take_while(|(i, _)| *i < max)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &text[..cut])
    }
}

#[async_trait]
impl ProviderSession for GeminiSession {
    async fn send(&self, user_message: &str) -> Result<Completion, GatewayError> {
        let parsed: types::GenerateResponse = self
            .bounded(async {
                let response = self.post("generateContent", &[], user_message).await?;
                response
                    .json()
                    .await
                    .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
            })
            .await?;

        debug!(model = %self.model, agent = %self.spec.agent, "generateContent completed");
        Ok(Completion {
            text: types::response_text(&parsed),
            usage: types::response_usage(&parsed),
        })
    }

    async fn send_streaming(&self, user_message: &str) -> Result<StreamHandle, GatewayError> {
        let response = self
            .bounded(self.post("streamGenerateContent", &[("alt", "sse")], user_message))
            .await?;

        let (tx, rx) = mpsc::channel(64);
        let timeout = self.timeout;
        let agent = self.spec.agent;

        tokio::spawn(async move {
            let mut stream = response.bytes_stream().eventsource();
            let mut usage = TokenUsage::default();

            loop {
                let next = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                        Ok(item) => item,
                        Err(_) => {
                            let _ = tx.send(ProviderEvent::Error("stream timeout".into())).await;
                            return;
                        }
                    },
                    None => stream.next().await,
                };

                let Some(item) = next else { break };

                match item {
                    Ok(event) => {
                        let chunk: types::GenerateResponse =
                            match serde_json::from_str(&event.data) {
                                Ok(chunk) => chunk,
                                Err(e) => {
                                    warn!(agent = %agent, "unparseable stream chunk: {}", e);
                                    let _ = tx
                                        .send(ProviderEvent::Error(format!(
                                            "malformed stream chunk: {e}"
                                        )))
                                        .await;
                                    return;
                                }
                            };

                        let text = types::response_text(&chunk);
                        if let Some(counted) = chunk.usage_metadata.as_ref() {
                            usage = TokenUsage::new(
                                counted.prompt_token_count.unwrap_or(usage.input_tokens),
                                counted
                                    .candidates_token_count
                                    .unwrap_or(usage.output_tokens),
                            );
                        }
                        if !text.is_empty() {
                            // A closed receiver means the invoker abandoned
                            // the call; stop reading the provider.
                            if tx.send(ProviderEvent::Delta(text)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(ProviderEvent::Error(e.to_string())).await;
                        return;
                    }
                }
            }

            let _ = tx.send(ProviderEvent::Completed { usage }).await;
        });

        Ok(StreamHandle::new(rx))
    }
}
