// src/ai/handlers.rs
//! Gemini proxy handlers

use axum::{
    body::Bytes,
    extract::Extension,
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::models::{
    strip_code_fences, ChatRequest, ChatResponse, RoadmapRequest, RoadmapResponse,
    CHAT_FALLBACK_REPLY,
};
use crate::common::{proxy_cors_headers, ApiError, AppState};

/// POST /chat-gemini - forward the chat history, return the first candidate
pub async fn chat_gemini(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    body: Bytes,
) -> Result<(HeaderMap, Json<ChatResponse>), ApiError> {
    let state = state_lock.read().await.clone();

    let request: ChatRequest = serde_json::from_slice(&body)?;
    debug!(messages = request.messages.len(), "Chat request received");

    let response = state
        .gemini_service
        .generate_content(&request.to_upstream())
        .await?;

    let reply = match response.first_text().filter(|text| !text.is_empty()) {
        Some(text) => text.to_string(),
        None => {
            warn!("Upstream returned no candidate text, using fallback reply");
            CHAT_FALLBACK_REPLY.to_string()
        }
    };

    info!(reply_len = reply.len(), "Chat reply generated");

    Ok((proxy_cors_headers(), Json(ChatResponse { reply })))
}

/// POST /generate-roadmap - ask for a Mermaid flowchart for a topic
pub async fn generate_roadmap(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    body: Bytes,
) -> Result<(HeaderMap, Json<RoadmapResponse>), ApiError> {
    let state = state_lock.read().await.clone();

    let request: RoadmapRequest = serde_json::from_slice(&body)?;
    debug!(topic = %request.topic, "Roadmap request received");

    let response = state
        .gemini_service
        .generate_content(&request.to_upstream())
        .await?;

    let roadmap = strip_code_fences(response.first_text().unwrap_or_default());

    info!(topic = %request.topic, roadmap_len = roadmap.len(), "Roadmap generated");

    Ok((proxy_cors_headers(), Json(RoadmapResponse { roadmap })))
}
