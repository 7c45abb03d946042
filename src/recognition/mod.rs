//! Optional pre-processing through Google Cloud recognizers.
//!
//! Audio clips are transcribed and images are labeled; the results are
//! spliced into the owning turn's text before the Gemini body is built.

pub mod speech;
pub mod vision;

pub use speech::SpeechClient;
pub use vision::VisionClient;

use crate::config::Config;
use crate::converters::chat::ChatTurn;
use crate::request_id::RequestId;
use anyhow::{Context, Result};
use tracing::{debug, warn};

pub const AUDIO_TRANSCRIPT_LABEL: &str = "audio transcript";
pub const IMAGE_LABELS_LABEL: &str = "image labels";

/// Recognizers enabled for one invocation.
pub struct Recognizers<'a> {
    speech: Option<SpeechClient<'a>>,
    vision: Option<VisionClient<'a>>,
}

impl<'a> Recognizers<'a> {
    /// Services without their own key reuse the caller's Gemini key.
    pub fn new(
        http_client: &'a reqwest::Client,
        config: &'a Config,
        api_key: &'a str,
        request_id: &'a RequestId,
    ) -> Self {
        let speech = config.speech.as_ref().map(|settings| {
            let key = settings.api_key.as_deref().unwrap_or(api_key);
            SpeechClient::new(http_client, settings, key, request_id)
        });
        let vision = config.vision.as_ref().map(|settings| {
            let key = settings.api_key.as_deref().unwrap_or(api_key);
            VisionClient::new(http_client, settings, key, request_id)
        });
        Self { speech, vision }
    }

    /// Run every turn's media through the enabled recognizers, audio first.
    ///
    /// Audio is consumed here; images stay on the turn to be sent inline.
    pub async fn enrich(&self, turns: &mut [ChatTurn]) -> Result<()> {
        for (index, turn) in turns.iter_mut().enumerate() {
            let audio = std::mem::take(&mut turn.audio);
            match &self.speech {
                Some(speech) => {
                    for clip in &audio {
                        let transcript = speech
                            .recognize(&clip.bytes)
                            .await
                            .with_context(|| format!("transcribing audio of message {}", index))?;
                        turn.splice(AUDIO_TRANSCRIPT_LABEL, &transcript);
                    }
                }
                None if !audio.is_empty() => {
                    warn!("Speech recognition is not configured, dropping {} audio clip(s) of message {}", audio.len(), index);
                }
                None => {}
            }

            if let Some(vision) = &self.vision {
                let mut labels = Vec::with_capacity(turn.images.len());
                for image in &turn.images {
                    let found = vision
                        .label_detection(&image.bytes)
                        .await
                        .with_context(|| format!("labeling image of message {}", index))?;
                    debug!("message {} image labels: {}", index, found);
                    labels.push(found);
                }
                for found in labels {
                    turn.splice(IMAGE_LABELS_LABEL, &found);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpeechSettings, VisionSettings};
    use crate::converters::chat::InlineMedia;
    use mockito::Matcher;
    use serde_json::json;

    fn turn_with_media() -> ChatTurn {
        let mut turn = ChatTurn::text("user", "look and listen");
        turn.images.push(InlineMedia::from_base64("image/png", "aW1hZ2U=").unwrap());
        turn.audio.push(InlineMedia::from_base64("audio/wav", "YXVkaW8=").unwrap());
        turn
    }

    #[tokio::test]
    async fn test_enrich_splices_transcript_then_labels() {
        let mut server = mockito::Server::new_async().await;
        let speech_mock = server
            .mock("POST", Matcher::Regex(r"^/speech".to_string()))
            .match_query(Matcher::UrlEncoded("key".into(), "gemini-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "results": [ { "alternatives": [ { "transcript": "what breed is it" } ] } ] }).to_string())
            .create_async()
            .await;
        let vision_mock = server
            .mock("POST", Matcher::Regex(r"^/vision".to_string()))
            .match_query(Matcher::UrlEncoded("key".into(), "own-vision-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "responses": [ { "labelAnnotations": [ { "description": "Dog" }, { "description": "Beagle" } ] } ] }).to_string())
            .create_async()
            .await;

        let config = Config {
            speech: Some(SpeechSettings {
                endpoint: format!("{}/speech", server.url()),
                ..Default::default()
            }),
            vision: Some(VisionSettings {
                endpoint: format!("{}/vision", server.url()),
                api_key: Some("own-vision-key".to_string()),
                max_results: None,
            }),
            ..Default::default()
        };
        let client = reqwest::Client::new();
        let request_id = RequestId::generate();
        let recognizers = Recognizers::new(&client, &config, "gemini-key", &request_id);

        let mut turns = vec![ChatTurn::text("system", "sys"), turn_with_media()];
        recognizers.enrich(&mut turns).await.unwrap();

        assert_eq!(turns[0].text, "sys");
        assert_eq!(
            turns[1].text,
            "look and listen\n\n[audio transcript] what breed is it\n\n[image labels] Dog, Beagle"
        );
        assert!(turns[1].audio.is_empty());
        assert_eq!(turns[1].images.len(), 1);
        speech_mock.assert_async().await;
        vision_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_enrich_without_services_drops_audio_only() {
        let config = Config::default();
        let client = reqwest::Client::new();
        let request_id = RequestId::generate();
        let recognizers = Recognizers::new(&client, &config, "k", &request_id);

        let mut turns = vec![turn_with_media()];
        recognizers.enrich(&mut turns).await.unwrap();

        assert_eq!(turns[0].text, "look and listen");
        assert!(turns[0].audio.is_empty());
        assert_eq!(turns[0].images.len(), 1);
    }

    #[tokio::test]
    async fn test_enrich_propagates_recognizer_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Regex(r"^/speech".to_string()))
            .with_status(500)
            .with_body("backend error")
            .create_async()
            .await;

        let config = Config {
            speech: Some(SpeechSettings {
                endpoint: format!("{}/speech", server.url()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let client = reqwest::Client::new();
        let request_id = RequestId::generate();
        let recognizers = Recognizers::new(&client, &config, "k", &request_id);

        let mut turns = vec![turn_with_media()];
        let err = recognizers.enrich(&mut turns).await.unwrap_err();
        assert!(format!("{:#}", err).contains("message 0"));
        assert!(format!("{:#}", err).contains("backend error"));
    }
}
