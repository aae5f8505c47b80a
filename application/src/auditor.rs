//! The confidence audit pass.
//!
//! One silent, tools-enabled call re-scores the assembled report. The pass
//! is best-effort by contract: every failure, provider or parse, is absorbed
//! at this boundary and the caller simply gets no confidence data. It runs
//! once per phase-2 run regardless of which agents were enabled, because it
//! audits the whole report.

use crate::invoker::{AgentInvoker, InvokeError};
use crate::ports::provider_gateway::CallSpec;
use atelier_domain::{
    AgentId, ConfidenceEntry, ConfidenceMap, PromptCatalog, Report, StepPrompt, extract,
};
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct AuditSheet {
    confidence: ConfidenceRaw,
}

type ConfidenceRaw = std::collections::BTreeMap<String, RawEntry>;

#[derive(Deserialize)]
struct RawEntry {
    score: f64,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default, alias = "factCheck")]
    fact_check: Option<String>,
}

/// Audits assembled reports for density, coherence, and factual grounding.
pub struct ConfidenceAuditor<'a> {
    invoker: &'a AgentInvoker,
}

impl<'a> ConfidenceAuditor<'a> {
    pub fn new(invoker: &'a AgentInvoker) -> Self {
        Self { invoker }
    }

    /// Audit the report. Returns `None` on any failure — never an error.
    pub async fn audit(&self, brief: &str, report: &Report) -> Option<ConfidenceMap> {
        let sections: Vec<(AgentId, String)> = report
            .sections()
            .map(|(agent, content)| (agent, content.as_plain_text()))
            .collect();

        if sections.is_empty() {
            return None;
        }

        let spec = CallSpec::for_agent(
            AgentId::Auditor,
            PromptCatalog::builtin(AgentId::Auditor, Default::default()),
        )
        .with_tools();
        let user_message = StepPrompt::auditor(brief, &sections);

        let run = match self.invoker.run_silent(spec, &user_message).await {
            Ok(run) => run,
            Err(InvokeError::Gateway(e)) => {
                warn!("confidence audit failed, report ships without it: {}", e);
                return None;
            }
            Err(InvokeError::Cancelled(_)) => return None,
        };

        let sheet = extract::<AuditSheet>(&run.text, true)?;
        let map = Self::into_map(sheet.confidence);

        if map.is_empty() { None } else { Some(map) }
    }

    /// Keep entries for known section agents only, clamping scores.
    fn into_map(raw: ConfidenceRaw) -> ConfidenceMap {
        raw.into_iter()
            .filter_map(|(name, entry)| {
                let agent: AgentId = name.parse().ok()?;
                AgentId::SECTIONS.contains(&agent).then_some((
                    agent,
                    ConfidenceEntry {
                        score: entry.score.clamp(0.0, 100.0).round() as u8,
                        flags: entry.flags,
                        fact_check: entry.fact_check,
                    },
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider_gateway::{
        Completion, GatewayError, ProviderGateway, ProviderSession, StreamHandle,
    };
    use crate::ports::transcript::NoTranscript;
    use async_trait::async_trait;
    use atelier_domain::{SectionContent, TokenUsage};
    use std::sync::Arc;

    struct CannedGateway {
        response: Result<String, ()>,
        saw_tools: Arc<std::sync::Mutex<Option<bool>>>,
    }

    struct CannedSession {
        response: String,
    }

    #[async_trait]
    impl ProviderSession for CannedSession {
        async fn send(&self, _user: &str) -> Result<Completion, GatewayError> {
            Ok(Completion {
                text: self.response.clone(),
                usage: TokenUsage::default(),
            })
        }

        async fn send_streaming(&self, _user: &str) -> Result<StreamHandle, GatewayError> {
            unreachable!("auditor never streams")
        }
    }

    #[async_trait]
    impl ProviderGateway for CannedGateway {
        async fn open(
            &self,
            spec: crate::ports::provider_gateway::CallSpec,
        ) -> Result<Box<dyn ProviderSession>, GatewayError> {
            *self.saw_tools.lock().unwrap() = Some(spec.tools_enabled);
            match &self.response {
                Ok(text) => Ok(Box::new(CannedSession {
                    response: text.clone(),
                })),
                Err(()) => Err(GatewayError::ConnectionError("down".into())),
            }
        }
    }

    fn fixture(response: Result<&str, ()>) -> (AgentInvoker, Arc<std::sync::Mutex<Option<bool>>>) {
        let saw_tools = Arc::new(std::sync::Mutex::new(None));
        let invoker = AgentInvoker::new(
            Arc::new(CannedGateway {
                response: response.map(|s| s.to_string()),
                saw_tools: saw_tools.clone(),
            }),
            Arc::new(NoTranscript),
        );
        (invoker, saw_tools)
    }

    fn report_with_sections() -> Report {
        let mut report = Report::new(None);
        report.set_section(AgentId::Strategist, SectionContent::Text("stratégie".into()));
        report.set_section(AgentId::Architect, SectionContent::Text("plan".into()));
        report
    }

    #[tokio::test]
    async fn audit_parses_confidence_and_enables_tools() {
        let response = r#"{"confidence": {
            "strategist": {"score": 81, "flags": [], "fact_check": "Two claims verified."},
            "architect": {"score": 74.6, "flags": ["dense"], "fact_check": "Checked timeline."},
            "scorer": {"score": 10}
        }}"#;
        let (invoker, saw_tools) = fixture(Ok(response));
        let map = ConfidenceAuditor::new(&invoker)
            .audit("brief", &report_with_sections())
            .await
            .unwrap();

        assert_eq!(*saw_tools.lock().unwrap(), Some(true));
        assert_eq!(map.len(), 2);
        assert_eq!(map[&AgentId::Strategist].score, 81);
        assert_eq!(map[&AgentId::Architect].score, 75);
        assert_eq!(
            map[&AgentId::Strategist].fact_check.as_deref(),
            Some("Two claims verified.")
        );
        // Non-section entries are dropped.
        assert!(!map.contains_key(&AgentId::Scorer));
    }

    #[tokio::test]
    async fn provider_failure_yields_none() {
        let (invoker, _) = fixture(Err(()));
        let result = ConfidenceAuditor::new(&invoker)
            .audit("brief", &report_with_sections())
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unparseable_output_yields_none() {
        let (invoker, _) = fixture(Ok("je refuse de répondre en JSON"));
        let result = ConfidenceAuditor::new(&invoker)
            .audit("brief", &report_with_sections())
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn empty_report_skips_the_call() {
        let (invoker, saw_tools) = fixture(Ok("{}"));
        let result = ConfidenceAuditor::new(&invoker)
            .audit("brief", &Report::new(None))
            .await;
        assert!(result.is_none());
        assert!(saw_tools.lock().unwrap().is_none());
    }
}
