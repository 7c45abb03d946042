use crate::converters::gemini::GeminiRequest;
use crate::request_id::{RequestId, REQUEST_ID_HEADER};
use reqwest::header::HeaderValue;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct GeminiClient {
    http_client: Arc<reqwest::Client>,
}

impl GeminiClient {
    pub fn new(http_client: Arc<reqwest::Client>) -> Self {
        Self { http_client }
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Build `{api_base}/models/{model}:generateContent`; the key goes in the query string.
    pub fn build_target_url(api_base: &str, model: &str) -> String {
        let path = format!("models/{}:generateContent", model);
        if api_base.ends_with('/') { format!("{}{}", api_base, path) } else { format!("{}/{}", api_base, path) }
    }

    pub fn generate_content(
        &self,
        request: &GeminiRequest,
        api_base: &str,
        model: &str,
        api_key: &str,
        request_id: &RequestId,
    ) -> impl Future<Output = Result<reqwest::Response, reqwest::Error>> {
        let target_url = Self::build_target_url(api_base, model);

        let mut target_request = self
            .http_client
            .post(&target_url)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json");

        if let Ok(val) = HeaderValue::from_str(&request_id.0) {
            target_request = target_request.header(REQUEST_ID_HEADER, val);
        }

        info!("Forwarding request to: {}", target_url);
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                "request body: {}",
                serde_json::to_string(request).unwrap_or_else(|e| format!("<unserializable: {}>", e))
            );
        }
        target_request.json(request).send()
    }
}
