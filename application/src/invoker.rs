//! Agent invocation.
//!
//! [`AgentInvoker`] wraps one call to the text-generation capability: it
//! turns a token stream into an accumulated [`AgentRun`] plus incremental
//! chunk events, and captures the provider's usage counters. Internal
//! agents (scorer, auditor) use the silent variant, which emits no events.

use crate::events::{ChannelClosed, EventSender};
use crate::ports::provider_gateway::{CallSpec, GatewayError, ProviderGateway};
use crate::ports::transcript::TranscriptLogger;
use atelier_domain::{AgentRun, PipelineEvent, ProviderEvent};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while invoking an agent.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The subscriber disconnected mid-stream; the call was abandoned.
    #[error(transparent)]
    Cancelled(#[from] ChannelClosed),
}

/// Runs single agent calls against the provider gateway.
pub struct AgentInvoker {
    gateway: Arc<dyn ProviderGateway>,
    transcript: Arc<dyn TranscriptLogger>,
}

impl AgentInvoker {
    pub fn new(gateway: Arc<dyn ProviderGateway>, transcript: Arc<dyn TranscriptLogger>) -> Self {
        Self {
            gateway,
            transcript,
        }
    }

    /// Invoke one agent, streaming its output to the event channel.
    ///
    /// Emits `agent_start` before the first byte is requested, one
    /// `agent_chunk` per provider delta (order preserved, no buffering),
    /// and exactly one `agent_done` on completion. A provider failure
    /// freezes the run as failed and surfaces as a recoverable error; the
    /// orchestrator decides what that means for the pipeline.
    pub async fn run_streamed(
        &self,
        spec: CallSpec,
        user_message: &str,
        events: &EventSender,
    ) -> Result<AgentRun, InvokeError> {
        debug_assert!(!spec.system_instruction.trim().is_empty());
        debug_assert!(!user_message.trim().is_empty());

        let agent = spec.agent;
        let mut run = AgentRun::new(agent);

        events.send(PipelineEvent::AgentStart { agent }).await?;

        let session = match self.gateway.open(spec).await {
            Ok(session) => session,
            Err(e) => return Err(self.freeze_failed(run, e)),
        };
        let mut handle = match session.send_streaming(user_message).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.freeze_failed(run, e)),
        };

        while let Some(event) = handle.receiver.recv().await {
            match event {
                ProviderEvent::Delta(chunk) => {
                    run.append(&chunk);
                    // A failed send means the subscriber is gone: drop the
                    // stream handle so the provider read loop stops too.
                    events
                        .send(PipelineEvent::AgentChunk { agent, text: chunk })
                        .await?;
                }
                ProviderEvent::Completed { usage } => {
                    run.complete(usage);
                    break;
                }
                ProviderEvent::Error(message) => {
                    return Err(self.freeze_failed(run, GatewayError::RequestFailed(message)));
                }
            }
        }

        if !run.done {
            // Stream ended without an explicit completion; freeze with what
            // arrived.
            run.complete(run.usage);
        }

        events.send(PipelineEvent::AgentDone { agent }).await?;

        debug!(
            agent = %agent,
            input_tokens = run.usage.input_tokens,
            output_tokens = run.usage.output_tokens,
            "agent completed"
        );
        self.transcript.record(&run);
        Ok(run)
    }

    /// Invoke one agent without streaming and without events.
    ///
    /// Used by the scorer and the auditor, which are internal and must not
    /// appear on the caller's event stream.
    pub async fn run_silent(
        &self,
        spec: CallSpec,
        user_message: &str,
    ) -> Result<AgentRun, InvokeError> {
        debug_assert!(!spec.system_instruction.trim().is_empty());
        debug_assert!(!user_message.trim().is_empty());

        let agent = spec.agent;
        let mut run = AgentRun::new(agent);

        let session = match self.gateway.open(spec).await {
            Ok(session) => session,
            Err(e) => return Err(self.freeze_failed(run, e)),
        };
        match session.send(user_message).await {
            Ok(completion) => {
                run.append(&completion.text);
                run.complete(completion.usage);
                self.transcript.record(&run);
                Ok(run)
            }
            Err(e) => Err(self.freeze_failed(run, e)),
        }
    }

    fn freeze_failed(&self, mut run: AgentRun, error: GatewayError) -> InvokeError {
        run.fail(error.to_string());
        self.transcript.record(&run);
        InvokeError::Gateway(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider_gateway::{Completion, ProviderSession, StreamHandle};
    use crate::ports::transcript::NoTranscript;
    use async_trait::async_trait;
    use atelier_domain::{AgentId, TokenUsage};
    use tokio::sync::mpsc;

    struct ScriptedSession {
        chunks: Vec<String>,
        fail_mid_stream: bool,
    }

    #[async_trait]
    impl ProviderSession for ScriptedSession {
        async fn send_streaming(&self, _user: &str) -> Result<StreamHandle, GatewayError> {
            let (tx, rx) = mpsc::channel(16);
            for chunk in &self.chunks {
                tx.send(ProviderEvent::Delta(chunk.clone())).await.unwrap();
            }
            if self.fail_mid_stream {
                tx.send(ProviderEvent::Error("connection reset".into()))
                    .await
                    .unwrap();
            } else {
                tx.send(ProviderEvent::Completed {
                    usage: TokenUsage::new(7, 3),
                })
                .await
                .unwrap();
            }
            Ok(StreamHandle::new(rx))
        }
    }

    struct ScriptedGateway {
        chunks: Vec<String>,
        fail_mid_stream: bool,
    }

    #[async_trait]
    impl ProviderGateway for ScriptedGateway {
        async fn open(&self, _spec: CallSpec) -> Result<Box<dyn ProviderSession>, GatewayError> {
            Ok(Box::new(ScriptedSession {
                chunks: self.chunks.clone(),
                fail_mid_stream: self.fail_mid_stream,
            }))
        }
    }

    fn invoker(chunks: &[&str], fail_mid_stream: bool) -> AgentInvoker {
        AgentInvoker::new(
            Arc::new(ScriptedGateway {
                chunks: chunks.iter().map(|c| c.to_string()).collect(),
                fail_mid_stream,
            }),
            Arc::new(NoTranscript),
        )
    }

    #[tokio::test]
    async fn streamed_run_emits_start_chunks_done() {
        let invoker = invoker(&["Bon", "jour"], false);
        let (events, mut rx) = EventSender::channel(32);

        let run = invoker
            .run_streamed(
                CallSpec::for_agent(AgentId::Copywriter, "write"),
                "the brief",
                &events,
            )
            .await
            .unwrap();

        assert_eq!(run.text, "Bonjour");
        assert!(run.done);
        assert_eq!(run.usage, TokenUsage::new(7, 3));

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                PipelineEvent::AgentStart {
                    agent: AgentId::Copywriter
                },
                PipelineEvent::AgentChunk {
                    agent: AgentId::Copywriter,
                    text: "Bon".into()
                },
                PipelineEvent::AgentChunk {
                    agent: AgentId::Copywriter,
                    text: "jour".into()
                },
                PipelineEvent::AgentDone {
                    agent: AgentId::Copywriter
                },
            ]
        );
    }

    #[tokio::test]
    async fn mid_stream_failure_surfaces_without_done_event() {
        let invoker = invoker(&["partial"], true);
        let (events, mut rx) = EventSender::channel(32);

        let result = invoker
            .run_streamed(
                CallSpec::for_agent(AgentId::Architect, "plan"),
                "the brief",
                &events,
            )
            .await;
        assert!(matches!(result, Err(InvokeError::Gateway(_))));

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        assert!(
            !seen
                .iter()
                .any(|e| matches!(e, PipelineEvent::AgentDone { .. }))
        );
    }

    #[tokio::test]
    async fn dropped_subscriber_cancels_the_run() {
        let invoker = invoker(&["chunk"], false);
        let (events, rx) = EventSender::channel(32);
        drop(rx);

        let result = invoker
            .run_streamed(
                CallSpec::for_agent(AgentId::Critic, "review"),
                "the brief",
                &events,
            )
            .await;
        assert!(matches!(result, Err(InvokeError::Cancelled(_))));
    }

    #[tokio::test]
    async fn silent_run_emits_no_events() {
        struct SilentGateway;

        struct SilentSession;

        #[async_trait]
        impl ProviderSession for SilentSession {
            async fn send(&self, _user: &str) -> Result<Completion, GatewayError> {
                Ok(Completion {
                    text: "{\"scores\": []}".into(),
                    usage: TokenUsage::new(5, 1),
                })
            }

            async fn send_streaming(&self, _user: &str) -> Result<StreamHandle, GatewayError> {
                unreachable!("silent calls never stream")
            }
        }

        #[async_trait]
        impl ProviderGateway for SilentGateway {
            async fn open(
                &self,
                _spec: CallSpec,
            ) -> Result<Box<dyn ProviderSession>, GatewayError> {
                Ok(Box::new(SilentSession))
            }
        }

        let invoker = AgentInvoker::new(Arc::new(SilentGateway), Arc::new(NoTranscript));
        let run = invoker
            .run_silent(CallSpec::for_agent(AgentId::Scorer, "rank"), "candidates")
            .await
            .unwrap();
        assert!(run.done);
        assert_eq!(run.text, "{\"scores\": []}");
    }
}
