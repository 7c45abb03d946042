use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::converters::gemini::{gemini_candidate::GeminiCandidate, gemini_part::GeminiPart};

const UNKNOWN_ERROR: &str = "未知错误";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<GeminiCandidate>>,
    /// Error envelope returned on non-2xx statuses: `{code, message, status}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(rename = "usageMetadata")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(rename = "promptFeedback")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<Value>,
    #[serde(rename = "modelVersion")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiUsage {
    #[serde(rename = "promptTokenCount")]
    pub prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    pub candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    pub total_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Normalize an arbitrary upstream body into the text handed back to the caller.
    pub fn extract_text(response: &Value, model: &str) -> String {
        match serde_json::from_value::<GeminiResponse>(response.clone()) {
            Ok(resp) => resp.into_text(model),
            Err(e) => {
                warn!("Unrecognized Gemini response shape: {}", e);
                no_response(model)
            }
        }
    }

    pub fn into_text(self, model: &str) -> String {
        if let Some(usage) = &self.usage_metadata {
            debug!(
                "usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        let candidate = self.candidates.unwrap_or_default().into_iter().next();
        if let Some(candidate) = candidate {
            let first_part = candidate.content.and_then(|c| c.parts.into_iter().next());
            return match first_part {
                Some(GeminiPart::Text { text, .. }) => text,
                _ => {
                    warn!("Gemini candidate has no text part, finish reason: {:?}", candidate.finish_reason);
                    format!("{} API 返回未知错误: 无法获取有效的响应文本", model)
                }
            };
        }

        if let Some(error) = self.error {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_ERROR);
            return format!("{} API 错误: {}", model, message);
        }

        if let Some(feedback) = &self.prompt_feedback {
            warn!("Gemini returned no candidates, prompt feedback: {}", feedback);
        }
        no_response(model)
    }
}

fn no_response(model: &str) -> String {
    format!("{} API 返回未知错误: 无法获取有效的响应", model)
}
