use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInputAudio {
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Decoded media attached to a conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineMedia {
    pub mime_type: String,
    pub bytes: Bytes,
}

impl InlineMedia {
    pub fn from_base64(mime_type: impl Into<String>, data: &str) -> Result<Self, base64::DecodeError> {
        let bytes = BASE64.decode(data.trim())?;
        Ok(InlineMedia {
            mime_type: mime_type.into(),
            bytes: Bytes::from(bytes),
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

impl ChatInputAudio {
    pub fn mime_type(&self) -> String {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("wav") => "audio/wav".to_string(),
            Some("mp3") => "audio/mpeg".to_string(),
            Some(other) if other.contains('/') => other.to_string(),
            Some(other) => format!("audio/{}", other),
        }
    }
}

/// Split `data:<mime>;base64,<data>` into its mime type and payload.
/// Anything else, including non-base64 data URLs, yields `None`.
pub fn parse_data_url(url: &str) -> Option<(String, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;

    let mut header_parts = header.split(';');
    let mime_type = header_parts.next()?.trim();
    if !header_parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return None;
    }
    let mime_type = if mime_type.is_empty() { "application/octet-stream" } else { mime_type };
    Some((mime_type.to_string(), data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url() {
        let (mime, data) = parse_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, "aGVsbG8=");

        assert!(parse_data_url("https://example.com/cat.png").is_none());
        assert!(parse_data_url("data:text/plain,hello").is_none());
        assert!(parse_data_url("data:image/png;base64").is_none());
    }

    #[test]
    fn test_inline_media_decodes_payload() {
        let media = InlineMedia::from_base64("image/png", "aGVsbG8=").unwrap();
        assert_eq!(media.bytes.as_ref(), b"hello");
        assert_eq!(media.to_base64(), "aGVsbG8=");
        assert!(InlineMedia::from_base64("image/png", "not base64!").is_err());
    }

    #[test]
    fn test_audio_mime_type() {
        let audio = |format: Option<&str>| ChatInputAudio {
            data: String::new(),
            format: format.map(str::to_string),
        };
        assert_eq!(audio(None).mime_type(), "audio/wav");
        assert_eq!(audio(Some("WAV")).mime_type(), "audio/wav");
        assert_eq!(audio(Some("mp3")).mime_type(), "audio/mpeg");
        assert_eq!(audio(Some("flac")).mime_type(), "audio/flac");
        assert_eq!(audio(Some("audio/ogg")).mime_type(), "audio/ogg");
    }
}
