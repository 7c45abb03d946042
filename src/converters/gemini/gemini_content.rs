use crate::converters::gemini::GeminiPart;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    pub role: Option<String>, // "user" or "model"
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user_text(text: &str) -> Self {
        GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart::text(text)],
        }
    }

    pub fn model_text(text: &str) -> Self {
        GeminiContent {
            role: Some("model".to_string()),
            parts: vec![GeminiPart::text(text)],
        }
    }
}
