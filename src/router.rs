use crate::auth::ApiKey;
use crate::config::Config;
use crate::converters::{
    chat::{ChatRequest, ChatTurn},
    gemini::{GeminiRequest, GeminiResponse},
};
use crate::gemini_client::GeminiClient;
use crate::models::ErrorResponse;
use crate::recognition::Recognizers;
use crate::request_id::{self, RequestId};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    /// Swapped wholesale when the config file is reloaded
    pub config: Arc<RwLock<Arc<Config>>>,
    pub gemini_client: Arc<GeminiClient>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/.netlify/functions/gemini", post(chat))
        .route("/health", get(|| async { "OK" }))
        .layer(axum::middleware::from_fn(request_id::inject_request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[axum_macros::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    api_key: ApiKey,
    Json(chat_request): Json<ChatRequest>,
) -> Response {
    route_chat(state, api_key, request_id, chat_request).await
}

pub async fn route_chat(
    state: AppState,
    api_key: ApiKey,
    request_id: RequestId,
    chat_request: ChatRequest,
) -> Response {
    // Snapshot so a reload mid-invocation cannot mix settings
    let config = state.config.read().await.clone();

    let requested_model = chat_request.model;
    let resolved_model = config.resolve_model(&requested_model).to_string();
    info!(
        "Chat request for model '{}' (upstream '{}') with {} message(s)",
        requested_model,
        resolved_model,
        chat_request.messages.len()
    );

    let mut turns: Vec<ChatTurn> = Vec::with_capacity(chat_request.messages.len());
    for (index, message) in chat_request.messages.into_iter().enumerate() {
        match message.into_turn() {
            Ok(turn) => turns.push(turn),
            Err(e) => {
                info!("Rejecting message {}: {:#}", index, e);
                return ErrorResponse::new(
                    format!("Invalid message {}: {:#}", index, e),
                    "invalid_request_error",
                    "invalid_media",
                )
                .with_status(StatusCode::BAD_REQUEST);
            }
        }
    }

    let recognizers = Recognizers::new(state.gemini_client.http_client(), &config, &api_key.0, &request_id);
    if let Err(e) = recognizers.enrich(&mut turns).await {
        warn!("Recognition failed: {:#}", e);
        return ErrorResponse::new(format!("Recognition failed: {:#}", e), "api_error", "recognition_failed")
            .with_status(StatusCode::BAD_GATEWAY);
    }

    let body = GeminiRequest::from_turns(&turns, &requested_model, &config);

    let response = match state
        .gemini_client
        .generate_content(&body, &config.gemini.api_base, &resolved_model, &api_key.0, &request_id)
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            let e = e.without_url();
            warn!("Failed to send request: {}", e);
            return ErrorResponse::new(format!("Failed to send request: {}", e), "api_error", "request_failed")
                .with_status(StatusCode::BAD_GATEWAY);
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("Gemini responded with status {}", status);
    }

    // Error envelopes are JSON too, so the body is parsed whatever the status
    let response_json: Value = match response.json().await {
        Ok(json) => json,
        Err(e) => {
            let e = e.without_url();
            warn!("Failed to parse response: {}", e);
            return ErrorResponse::new(format!("Failed to parse response: {}", e), "api_error", "parse_error")
                .with_status(StatusCode::BAD_GATEWAY);
        }
    };
    debug!("raw response: {}", response_json);

    let text = GeminiResponse::extract_text(&response_json, &requested_model);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
}
