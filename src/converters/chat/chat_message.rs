use crate::converters::chat::chat_media::parse_data_url;
use crate::converters::chat::{ChatContent, ChatTurn, InlineMedia};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// Absent and `null` both mean no content
    #[serde(default)]
    pub content: Option<ChatContent>,
}

impl ChatMessage {
    /// Flatten the message into a turn, decoding any inline media.
    ///
    /// Fails only when a media payload claims to be base64 but does not decode.
    pub fn into_turn(self) -> anyhow::Result<ChatTurn> {
        let mut turn = ChatTurn {
            role: self.role,
            ..Default::default()
        };

        let items = match self.content.unwrap_or_default() {
            ChatContent::Text(text) => {
                turn.text = text;
                return Ok(turn);
            }
            ChatContent::Array(items) => items,
        };

        let mut texts: Vec<String> = Vec::new();
        for item in items {
            match item.r#type.as_str() {
                "text" => {
                    if let Some(text) = item.text {
                        texts.push(text);
                    }
                }
                "image_url" => {
                    let Some(image) = item.image_url else { continue };
                    match parse_data_url(&image.url) {
                        Some((mime_type, data)) => {
                            let media = InlineMedia::from_base64(mime_type, data)
                                .context("image_url carries invalid base64 data")?;
                            turn.images.push(media);
                        }
                        None => warn!("Dropping image that is not a base64 data URL"),
                    }
                }
                "input_audio" => {
                    let Some(audio) = item.input_audio else { continue };
                    let media = InlineMedia::from_base64(audio.mime_type(), &audio.data)
                        .context("input_audio carries invalid base64 data")?;
                    turn.audio.push(media);
                }
                other => debug!("Ignoring content item of type '{}'", other),
            }
        }
        turn.text = texts.join("\n");

        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_message() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "role": "user",
            "content": "Hello!"
        }))
        .unwrap();
        let turn = msg.into_turn().unwrap();
        assert_eq!(turn, ChatTurn::text("user", "Hello!"));
    }

    #[test]
    fn test_missing_content_is_empty_text() {
        let msg: ChatMessage = serde_json::from_value(json!({ "role": "assistant" })).unwrap();
        let turn = msg.into_turn().unwrap();
        assert!(turn.is_assistant());
        assert_eq!(turn.text, "");
    }

    #[test]
    fn test_null_content_is_empty_text() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": null
        }))
        .unwrap();
        let turn = msg.into_turn().unwrap();
        assert_eq!(turn, ChatTurn::text("assistant", ""));
    }

    #[test]
    fn test_mixed_content_items() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "role": "user",
            "content": [
                { "type": "text", "text": "Describe this" },
                { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,aGVsbG8=" } },
                { "type": "image_url", "image_url": { "url": "https://example.com/remote.png" } },
                { "type": "input_audio", "input_audio": { "data": "d29ybGQ=", "format": "wav" } },
                { "type": "text", "text": "and this" },
                { "type": "file", "file": { "file_id": "abc" } }
            ]
        }))
        .unwrap();

        let turn = msg.into_turn().unwrap();
        assert_eq!(turn.text, "Describe this\nand this");
        assert_eq!(turn.images.len(), 1);
        assert_eq!(turn.images[0].mime_type, "image/jpeg");
        assert_eq!(turn.images[0].bytes.as_ref(), b"hello");
        assert_eq!(turn.audio.len(), 1);
        assert_eq!(turn.audio[0].mime_type, "audio/wav");
        assert_eq!(turn.audio[0].bytes.as_ref(), b"world");
    }

    #[test]
    fn test_invalid_base64_is_error() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "role": "user",
            "content": [
                { "type": "input_audio", "input_audio": { "data": "%%%" } }
            ]
        }))
        .unwrap();
        assert!(msg.into_turn().is_err());
    }
}
