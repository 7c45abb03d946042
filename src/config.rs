use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiSettings,
    /// Speech transcription is enabled only when this section is present
    #[serde(default)]
    pub speech: Option<SpeechSettings>,
    /// Image labeling is enabled only when this section is present
    #[serde(default)]
    pub vision: Option<VisionSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_base: String,
    pub model_aliases: HashMap<String, String>,
    /// Models that get the googleSearch / googleSpeech / googleVision tool block
    pub search_models: Vec<String>,
    pub acknowledgement: String,
    pub closing_prompt: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            model_aliases: HashMap::from([("gemini".to_string(), "gemini-pro".to_string())]),
            search_models: vec![
                "gemini-2.0-flash-exp".to_string(),
                "gemini-2.0-flash".to_string(),
                "gemini-2.0-pro-exp".to_string(),
            ],
            acknowledgement: "好的".to_string(),
            closing_prompt: "prompt: research in english，respond in Chinese".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            api_key: None,
            encoding: "LINEAR16".to_string(),
            sample_rate_hertz: 16000,
            language_code: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_results: Option<u32>,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            api_key: None,
            max_results: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        // An empty file deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve a requested model name to the name used in the upstream URL.
    pub fn resolve_model<'a>(&'a self, model: &'a str) -> &'a str {
        self.gemini
            .model_aliases
            .get(model)
            .map(|m| m.as_str())
            .unwrap_or(model)
    }

    pub fn is_search_model(&self, model: &str) -> bool {
        self.gemini.search_models.iter().any(|m| m == model)
    }
}
