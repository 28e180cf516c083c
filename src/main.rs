// src/main.rs
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use learnhub::common::{AppState, ServerConfig};
use learnhub::router::create_router;
use learnhub::services::{GeminiConfig, GeminiService};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let server_config = ServerConfig::from_env();
    let gemini_config = GeminiConfig::from_env();

    info!(
        model = %gemini_config.model,
        base_url = %gemini_config.base_url,
        "Gemini upstream configured"
    );

    // The key is read per request; this is only a heads-up for operators.
    if gemini_config.api_key().is_err() {
        warn!(
            var = %gemini_config.api_key_var,
            "Gemini API key not set, proxy requests will fail until it is"
        );
    }

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        config: server_config.clone(),
        gemini_service: Arc::new(GeminiService::new(gemini_config)),
    };

    let shared = Arc::new(RwLock::new(app_state));

    let app = create_router(shared, server_config.log_body_limit);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
