// Application state shared across the proxy handlers

use std::sync::Arc;

use crate::common::config::ServerConfig;
use crate::services::GeminiService;

/// Application state containing configuration and the upstream client
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub gemini_service: Arc<GeminiService>,
}
