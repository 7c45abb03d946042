use crate::config::SpeechSettings;
use crate::request_id::{RequestId, REQUEST_ID_HEADER};
use anyhow::{bail, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct RecognizeRequest {
    audio: RecognitionAudio,
    config: RecognitionConfig,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: String,
    sample_rate_hertz: u32,
    language_code: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

/// Cloud Speech-to-Text `speech:recognize` over the shared HTTP client.
#[derive(Debug)]
pub struct SpeechClient<'a> {
    http_client: &'a reqwest::Client,
    settings: &'a SpeechSettings,
    api_key: &'a str,
    request_id: &'a RequestId,
}

impl<'a> SpeechClient<'a> {
    pub fn new(
        http_client: &'a reqwest::Client,
        settings: &'a SpeechSettings,
        api_key: &'a str,
        request_id: &'a RequestId,
    ) -> Self {
        Self { http_client, settings, api_key, request_id }
    }

    /// Transcribe raw audio; the top alternative of each result, one per line.
    pub async fn recognize(&self, audio: &[u8]) -> Result<String> {
        let request = RecognizeRequest {
            audio: RecognitionAudio { content: BASE64.encode(audio) },
            config: RecognitionConfig {
                encoding: self.settings.encoding.clone(),
                sample_rate_hertz: self.settings.sample_rate_hertz,
                language_code: self.settings.language_code.clone(),
            },
        };

        info!("Sending {} bytes of audio to: {}", audio.len(), self.settings.endpoint);
        let response = self
            .http_client
            .post(&self.settings.endpoint)
            .query(&[("key", self.api_key)])
            .header(REQUEST_ID_HEADER, self.request_id.0.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            bail!("speech recognition failed with status {}: {}", status, error_text);
        }

        let body: RecognizeResponse = response.json().await.map_err(|e| e.without_url())?;
        let transcript = body
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .collect::<Vec<_>>()
            .join("\n");
        debug!("transcript: {}", transcript);
        Ok(transcript)
    }
}
