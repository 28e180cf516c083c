// src/router.rs
//! HTTP router composition for the proxy service

use axum::{
    extract::Extension,
    http::{header, HeaderName, Method},
    middleware, Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::ai;
use crate::common::AppState;
use crate::logging_middleware::{log_request_response, BodyLogLimit};

pub fn create_router(shared: Arc<RwLock<AppState>>, log_body_limit: usize) -> Router {
    Router::new()
        // ====================================================================
        // AI PROXY ROUTES
        // ====================================================================
        .merge(ai::ai_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn_with_state(
            BodyLogLimit(log_body_limit),
            log_request_response,
        ))
        .layer(Extension(shared))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    HeaderName::from_static("x-client-info"),
                    HeaderName::from_static("apikey"),
                ]),
        )
        .layer(TraceLayer::new_for_http())
}
