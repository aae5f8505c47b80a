//! Candidate scoring.
//!
//! One non-streamed call ranks the idea generator's candidates on three
//! weighted criteria. Parsing failures never fail the pipeline: the first
//! five raw candidates pass through unscored instead.

use crate::invoker::{AgentInvoker, InvokeError};
use crate::ports::provider_gateway::CallSpec;
use atelier_domain::{AgentId, Idea, PromptCatalog, ScoredIdea, StepPrompt, extract};
use serde::Deserialize;
use tracing::{debug, warn};

/// How many candidates a scoring round keeps.
pub const TOP_CANDIDATES: usize = 5;

/// Result of one scoring round.
#[derive(Debug, Clone, Default)]
pub struct ScoreOutcome {
    /// The candidates that survived, best first.
    pub top: Vec<Idea>,
    /// Their verdicts, parallel to `top`. Empty when scoring fell back to
    /// raw pass-through.
    pub scores: Vec<ScoredIdea>,
}

#[derive(Deserialize)]
struct ScoreSheet {
    #[serde(default)]
    scores: Vec<RawScore>,
}

#[derive(Deserialize)]
struct RawScore {
    index: usize,
    total: f64,
    #[serde(default)]
    flags: Vec<String>,
}

/// Ranks idea candidates with one silent scorer call.
pub struct CandidateScorer<'a> {
    invoker: &'a AgentInvoker,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(invoker: &'a AgentInvoker) -> Self {
        Self { invoker }
    }

    /// Score `candidates` against the brief and prior context.
    ///
    /// Empty input returns empty results without a provider call. A
    /// provider failure is fatal (like any other provider error); a parse
    /// failure falls back to the first five candidates unscored.
    pub async fn score(
        &self,
        brief: &str,
        prior_context: Option<&str>,
        candidates: &[Idea],
    ) -> Result<ScoreOutcome, InvokeError> {
        if candidates.is_empty() {
            return Ok(ScoreOutcome::default());
        }

        let spec = CallSpec::for_agent(
            AgentId::Scorer,
            PromptCatalog::builtin(AgentId::Scorer, Default::default()),
        );
        let user_message = StepPrompt::scorer(brief, prior_context, candidates);
        let run = self.invoker.run_silent(spec, &user_message).await?;

        let scores = extract::<ScoreSheet>(&run.text, true)
            .map(|sheet| Self::rank(sheet, candidates.len()))
            .unwrap_or_default();

        if scores.is_empty() {
            warn!("scorer output unusable, passing first candidates through unscored");
            return Ok(ScoreOutcome {
                top: candidates.iter().take(TOP_CANDIDATES).cloned().collect(),
                scores: Vec::new(),
            });
        }

        let top = scores
            .iter()
            .map(|scored| candidates[scored.index].clone())
            .collect();

        debug!(kept = scores.len(), "scorer ranked candidates");
        Ok(ScoreOutcome { top, scores })
    }

    /// Filter to in-range indices, clamp totals, sort descending (stable,
    /// so ties keep original candidate order), truncate to five.
    ///
    /// The scorer-assigned index is carried through as-is. With duplicate
    /// `{title, body}` candidates the relative order among the duplicates
    /// is whatever the scorer assigned — undefined, but never out of range.
    fn rank(sheet: ScoreSheet, candidate_count: usize) -> Vec<ScoredIdea> {
        let mut scored: Vec<ScoredIdea> = sheet
            .scores
            .into_iter()
            .filter(|score| score.index < candidate_count)
            .map(|score| ScoredIdea {
                index: score.index,
                total: score.total.clamp(0.0, 100.0).round() as u8,
                flags: score.flags,
            })
            .collect();

        scored.sort_by(|a, b| b.total.cmp(&a.total));
        scored.truncate(TOP_CANDIDATES);
        scored
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
    use atelier_domain::TokenUsage;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedGateway {
        response: String,
        calls: Arc<AtomicUsize>,
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
            unreachable!("scorer never streams")
        }
    }

    #[async_trait]
    impl ProviderGateway for CannedGateway {
        async fn open(
            &self,
            _spec: crate::ports::provider_gateway::CallSpec,
        ) -> Result<Box<dyn ProviderSession>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CannedSession {
                response: self.response.clone(),
            }))
        }
    }

    fn scorer_fixture(response: &str) -> (AgentInvoker, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let invoker = AgentInvoker::new(
            Arc::new(CannedGateway {
                response: response.to_string(),
                calls: calls.clone(),
            }),
            Arc::new(NoTranscript),
        );
        (invoker, calls)
    }

    fn candidates(n: usize) -> Vec<Idea> {
        (0..n)
            .map(|i| Idea::new(format!("Idea {i}"), format!("body {i}")))
            .collect()
    }

    #[tokio::test]
    async fn empty_candidates_skip_the_provider() {
        let (invoker, calls) = scorer_fixture("{}");
        let outcome = CandidateScorer::new(&invoker)
            .score("brief", None, &[])
            .await
            .unwrap();
        assert!(outcome.top.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn scores_are_sorted_truncated_and_in_range() {
        let response = r#"{"scores": [
            {"index": 0, "total": 40, "flags": []},
            {"index": 1, "total": 88, "flags": ["générique"]},
            {"index": 2, "total": 88, "flags": []},
            {"index": 3, "total": 150, "flags": []},
            {"index": 4, "total": 61, "flags": []},
            {"index": 5, "total": 55, "flags": []},
            {"index": 99, "total": 99, "flags": []}
        ]}"#;
        let (invoker, _) = scorer_fixture(response);
        let outcome = CandidateScorer::new(&invoker)
            .score("brief", Some("context"), &candidates(7))
            .await
            .unwrap();

        assert_eq!(outcome.scores.len(), TOP_CANDIDATES);
        // Clamped to 100, descending, stable on the 88/88 tie.
        let totals: Vec<u8> = outcome.scores.iter().map(|s| s.total).collect();
        assert_eq!(totals, vec![100, 88, 88, 61, 55]);
        assert_eq!(outcome.scores[1].index, 1);
        assert_eq!(outcome.scores[2].index, 2);
        // Out-of-range index 99 was dropped.
        assert!(outcome.scores.iter().all(|s| s.index < 7));
        // Top candidates parallel the scores.
        assert_eq!(outcome.top[0].title, "Idea 3");
        assert_eq!(outcome.top[1].title, "Idea 1");
    }

    #[tokio::test]
    async fn fenced_scorer_output_is_tolerated() {
        let response = "Here are the rankings:\n```json\n{\"scores\": [{\"index\": 2, \"total\": 70}]}\n```";
        let (invoker, _) = scorer_fixture(response);
        let outcome = CandidateScorer::new(&invoker)
            .score("brief", None, &candidates(6))
            .await
            .unwrap();
        assert_eq!(outcome.scores.len(), 1);
        assert_eq!(outcome.top[0].title, "Idea 2");
    }

    #[tokio::test]
    async fn unusable_output_falls_back_to_first_five_unscored() {
        let (invoker, _) = scorer_fixture("je ne peux pas noter cela");
        let outcome = CandidateScorer::new(&invoker)
            .score("brief", None, &candidates(8))
            .await
            .unwrap();
        assert_eq!(outcome.top.len(), TOP_CANDIDATES);
        assert!(outcome.scores.is_empty());
        assert_eq!(outcome.top[0].title, "Idea 0");
    }

    #[tokio::test]
    async fn all_indices_out_of_range_falls_back() {
        let response = r#"{"scores": [{"index": 42, "total": 90}]}"#;
        let (invoker, _) = scorer_fixture(response);
        let outcome = CandidateScorer::new(&invoker)
            .score("brief", None, &candidates(6))
            .await
            .unwrap();
        assert!(outcome.scores.is_empty());
        assert_eq!(outcome.top.len(), 5);
    }
}
