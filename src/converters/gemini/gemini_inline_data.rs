use crate::converters::chat::InlineMedia;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

impl From<&InlineMedia> for GeminiInlineData {
    fn from(media: &InlineMedia) -> Self {
        GeminiInlineData {
            mime_type: media.mime_type.clone(),
            data: media.to_base64(),
        }
    }
}
