use crate::converters::gemini::GeminiInlineData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    // functionCall, executableCode, ... are never sent and only carried through on responses
    Other(Value),
}

impl GeminiPart {
    pub fn text(text: &str) -> Self {
        GeminiPart::Text {
            text: text.to_string(),
            thought: None,
        }
    }
}
