use crate::config::Config;
use crate::converters::chat::ChatTurn;
use serde::{Deserialize, Serialize};

use crate::converters::gemini::{
    gemini_content::GeminiContent,
    gemini_inline_data::GeminiInlineData,
    gemini_part::GeminiPart,
    gemini_safety_setting::GeminiSafetySetting,
    gemini_tool::GeminiTool,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "safetySettings")]
    pub safety_settings: Vec<GeminiSafetySetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiTool>>,
}

impl GeminiRequest {
    /// Build a generateContent body from normalized turns.
    ///
    /// The first turn is always sent as the user and answered by a synthetic
    /// acknowledgement, so an assistant reply in second position is dropped.
    /// A closing prompt is appended after the conversation. `requested_model`
    /// is the name the caller asked for, before alias resolution.
    pub fn from_turns(turns: &[ChatTurn], requested_model: &str, config: &Config) -> Self {
        let settings = &config.gemini;
        let mut contents: Vec<GeminiContent> = Vec::with_capacity(turns.len() + 2);

        for (index, turn) in turns.iter().enumerate() {
            if index == 0 {
                contents.push(GeminiContent {
                    role: Some("user".to_string()),
                    parts: turn_parts(turn),
                });
                contents.push(GeminiContent::model_text(&settings.acknowledgement));
            } else if index == 1 && turn.is_assistant() {
                continue;
            } else {
                let role = if turn.is_assistant() { "model" } else { "user" };
                contents.push(GeminiContent {
                    role: Some(role.to_string()),
                    parts: turn_parts(turn),
                });
            }
        }

        contents.push(GeminiContent::user_text(&settings.closing_prompt));

        let tools = if config.is_search_model(requested_model) {
            Some(vec![GeminiTool::google_builtins()])
        } else {
            None
        };

        GeminiRequest {
            contents,
            safety_settings: GeminiSafetySetting::block_none(),
            tools,
        }
    }
}

fn turn_parts(turn: &ChatTurn) -> Vec<GeminiPart> {
    let mut parts = vec![GeminiPart::text(&turn.text)];
    parts.extend(turn.images.iter().map(|image| GeminiPart::InlineData {
        inline_data: GeminiInlineData::from(image),
    }));
    parts
}
