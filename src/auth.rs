use crate::models::ErrorResponse;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, info};

/// Gemini API key supplied by the caller.
///
/// The function holds no key of its own: callers send their key as
/// `Authorization: Bearer <key>` (or `x-goog-api-key`) and it is forwarded
/// in the upstream query string.
#[derive(Clone)]
pub struct ApiKey(pub String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

pub fn api_key_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|hv| hv.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).trim())
        .filter(|key| !key.is_empty())
        .or_else(|| headers.get("x-goog-api-key").and_then(|hv| hv.to_str().ok()).map(str::trim))
        .filter(|key| !key.is_empty())
        .map(|key| key.to_string())
}

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match api_key_from_headers(&parts.headers) {
            Some(key) => {
                debug!("API key found in request headers");
                Ok(ApiKey(key))
            }
            None => {
                info!("Missing Authorization header");
                Err(ErrorResponse::new(
                    "Authorization header is required",
                    "invalid_request_error",
                    "missing_auth_header",
                )
                .with_status(StatusCode::UNAUTHORIZED))
            }
        }
    }
}
