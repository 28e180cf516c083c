// src/ai/routes.rs

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the AI proxy router
///
/// # Routes
/// - `POST /chat-gemini` - chat completion over a message history
/// - `POST /generate-roadmap` - Mermaid learning roadmap for a topic
///
/// OPTIONS preflight is answered by the CORS layer in `create_router`.
pub fn ai_routes() -> Router {
    Router::new()
        .route("/chat-gemini", post(handlers::chat_gemini))
        .route("/generate-roadmap", post(handlers::generate_roadmap))
}
