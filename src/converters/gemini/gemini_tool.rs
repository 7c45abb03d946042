use serde::{Deserialize, Serialize};

/// Built-in tools carry no configuration; they serialize as `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiToolConfig {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiTool {
    #[serde(rename = "googleSearch")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GeminiToolConfig>,
    #[serde(rename = "googleSpeech")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_speech: Option<GeminiToolConfig>,
    #[serde(rename = "googleVision")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_vision: Option<GeminiToolConfig>,
}

impl GeminiTool {
    pub fn google_builtins() -> Self {
        GeminiTool {
            google_search: Some(GeminiToolConfig::default()),
            google_speech: Some(GeminiToolConfig::default()),
            google_vision: Some(GeminiToolConfig::default()),
        }
    }
}
