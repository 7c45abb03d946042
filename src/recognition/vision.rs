use crate::config::VisionSettings;
use crate::request_id::{RequestId, REQUEST_ID_HEADER};
use anyhow::{anyhow, bail, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct BatchAnnotateImagesRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: Image,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    r#type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct BatchAnnotateImagesResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

/// Cloud Vision `images:annotate` restricted to label detection.
#[derive(Debug)]
pub struct VisionClient<'a> {
    http_client: &'a reqwest::Client,
    settings: &'a VisionSettings,
    api_key: &'a str,
    request_id: &'a RequestId,
}

impl<'a> VisionClient<'a> {
    pub fn new(
        http_client: &'a reqwest::Client,
        settings: &'a VisionSettings,
        api_key: &'a str,
        request_id: &'a RequestId,
    ) -> Self {
        Self { http_client, settings, api_key, request_id }
    }

    /// Label descriptions for one image, comma separated.
    pub async fn label_detection(&self, image: &[u8]) -> Result<String> {
        let request = BatchAnnotateImagesRequest {
            requests: vec![AnnotateImageRequest {
                image: Image { content: BASE64.encode(image) },
                features: vec![Feature {
                    r#type: "LABEL_DETECTION",
                    max_results: self.settings.max_results,
                }],
            }],
        };

        info!("Sending {} bytes of image to: {}", image.len(), self.settings.endpoint);
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
            bail!("label detection failed with status {}: {}", status, error_text);
        }

        let body: BatchAnnotateImagesResponse = response.json().await.map_err(|e| e.without_url())?;
        let annotated = body
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("label detection returned no responses"))?;
        if let Some(error) = annotated.error {
            bail!("label detection failed: {}", error.message);
        }

        let labels = annotated
            .label_annotations
            .into_iter()
            .map(|l| l.description)
            .collect::<Vec<_>>()
            .join(", ");
        debug!("labels: {}", labels);
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn settings(url: &str, max_results: Option<u32>) -> VisionSettings {
        VisionSettings {
            endpoint: format!("{}/v1/images:annotate", url),
            api_key: None,
            max_results,
        }
    }

    #[tokio::test]
    async fn test_label_detection_joins_descriptions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex(r"^/v1/images:annotate".to_string()))
            .match_query(Matcher::UrlEncoded("key".into(), "vision-key".into()))
            .match_body(Matcher::Json(json!({
                "requests": [ {
                    "image": { "content": "aGVsbG8=" },
                    "features": [ { "type": "LABEL_DETECTION", "maxResults": 5 } ]
                } ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "responses": [ {
                        "labelAnnotations": [
                            { "mid": "/m/01yrx", "description": "Cat", "score": 0.98 },
                            { "mid": "/m/0307l", "description": "Whiskers", "score": 0.91 }
                        ]
                    } ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let settings = settings(&server.url(), Some(5));
        let request_id = RequestId::generate();
        let vision = VisionClient::new(&client, &settings, "vision-key", &request_id);

        assert_eq!(vision.label_detection(b"hello").await.unwrap(), "Cat, Whiskers");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_label_detection_without_labels() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Regex(r"^/v1/images:annotate".to_string()))
            .match_body(Matcher::Regex(r#""type":"LABEL_DETECTION""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"responses":[{}]}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let settings = settings(&server.url(), None);
        let request_id = RequestId::generate();
        let vision = VisionClient::new(&client, &settings, "k", &request_id);

        assert_eq!(vision.label_detection(b"blank").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_per_image_error_is_propagated() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Regex(r"^/v1/images:annotate".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let settings = settings(&server.url(), None);
        let request_id = RequestId::generate();
        let vision = VisionClient::new(&client, &settings, "k", &request_id);

        let err = vision.label_detection(b"garbage").await.unwrap_err();
        assert!(err.to_string().contains("Bad image data."));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_hides_key() {
        let client = reqwest::Client::new();
        let settings = settings("http://127.0.0.1:1", None);
        let request_id = RequestId::generate();
        let vision = VisionClient::new(&client, &settings, "operator-vision-key", &request_id);

        let err = vision.label_detection(b"image").await.unwrap_err();
        assert!(!format!("{:#}", err).contains("operator-vision-key"));
    }
}
