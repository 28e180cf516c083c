// src/logging_middleware.rs
//! Middleware for logging proxy request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::{debug, Level};

use crate::common::helpers::truncate_for_log;

/// Upper bound on the body bytes printed per message
#[derive(Debug, Clone, Copy)]
pub struct BodyLogLimit(pub usize);

/// Logs bodies of non-preflight requests and their responses at debug level.
/// Does nothing unless debug logging is enabled, so bodies are not buffered
/// in normal operation.
pub async fn log_request_response(
    State(BodyLogLimit(limit)): State<BodyLogLimit>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !tracing::enabled!(Level::DEBUG) || request.method() == axum::http::Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        debug!(
            method = %parts.method,
            uri = %parts.uri.path(),
            request_body = %truncate_for_log(&String::from_utf8_lossy(&bytes), limit),
            "📥 Request"
        );
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        debug!(
            status = %parts.status,
            response_body = %truncate_for_log(&String::from_utf8_lossy(&bytes), limit),
            "📤 Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
