//! Gemini wire types and conversions
//!
//! Request/response shapes for the `generateContent` and
//! `streamGenerateContent` endpoints, plus the mapping into the
//! application-level [`Completion`] pieces (text + usage counters).

use atelier_application::CallSpec;
use atelier_domain::TokenUsage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: &str, role: Option<&str>) -> Self {
        Self {
            role: role.map(|r| r.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

/// Tool declaration. `google_search` grants the provider's own web-search
/// grounding, which doubles as the fact-checking capability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// Build the request body for one agent call.
pub fn build_request(spec: &CallSpec, user_message: &str) -> GenerateRequest {
    GenerateRequest {
        system_instruction: Content::text(&spec.system_instruction, None),
        contents: vec![Content::text(user_message, Some("user"))],
        generation_config: GenerationConfig {
            max_output_tokens: spec.max_output_tokens,
        },
        tools: spec.tools_enabled.then(|| {
            vec![Tool {
                google_search: serde_json::json!({}),
            }]
        }),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
}

/// Concatenate the text parts of the first candidate.
pub fn response_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Map the provider's usage metadata into domain counters.
pub fn response_usage(response: &GenerateResponse) -> TokenUsage {
    match &response.usage_metadata {
        Some(usage) => TokenUsage::new(
            usage.prompt_token_count.unwrap_or(0),
            usage.candidates_token_count.unwrap_or(0),
        ),
        None => TokenUsage::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_domain::AgentId;

    #[test]
    fn request_shape_is_camel_case() {
        let spec = CallSpec::for_agent(AgentId::Strategist, "instruct").with_tools();
        let body = serde_json::to_value(build_request(&spec, "the brief")).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "instruct"
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["generationConfig"]["maxOutputTokens"],
            AgentId::Strategist.max_output_tokens()
        );
        assert!(body["tools"][0].get("googleSearch").is_some());
    }

    #[test]
    fn tools_are_omitted_when_disabled() {
        let spec = CallSpec::for_agent(AgentId::Copywriter, "write");
        let body = serde_json::to_value(build_request(&spec, "the brief")).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn response_text_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{"content": {"role": "model", "parts": [
                    {"text": "Bon"}, {"text": "jour"}
                ]}}],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
            }"#,
        )
        .unwrap();

        assert_eq!(response_text(&response), "Bonjour");
        assert_eq!(response_usage(&response), TokenUsage::new(12, 4));
    }

    #[test]
    fn empty_chunks_are_tolerated() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response_text(&response), "");
        assert_eq!(response_usage(&response), TokenUsage::default());
    }
}
