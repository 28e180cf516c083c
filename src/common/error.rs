// Error handling types for the proxy API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use super::helpers::proxy_cors_headers;
use crate::services::gemini::GeminiError;

/// API error types
///
/// Every variant is reported to the caller the same way: a 500 with the
/// message in `{"error": ...}`. The variants only exist so logs can tell
/// the failures apart.
#[derive(Debug)]
pub enum ApiError {
    InvalidBody(String),
    ConfigMissing(String),
    Upstream(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::ConfigMissing(_) => "CONFIG_MISSING",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidBody(msg)
            | ApiError::ConfigMissing(msg)
            | ApiError::Upstream(msg) => msg,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

/// JSON error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        error!(kind = self.kind(), error = %self, "Proxy request failed");

        let body = ErrorResponse {
            error: self.message().to_string(),
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            proxy_cors_headers(),
            Json(body),
        )
            .into_response()
    }
}

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ConfigMissing(_) => ApiError::ConfigMissing(err.to_string()),
            GeminiError::RequestFailed(_)
            | GeminiError::Upstream { .. }
            | GeminiError::InvalidResponse(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody(err.to_string())
    }
}
