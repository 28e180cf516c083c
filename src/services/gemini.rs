// src/services/gemini.rs
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("{0} is not configured")]
    ConfigMissing(String),

    #[error("Upstream request failed: {0}")]
    RequestFailed(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is read on every request, never cached.
    pub api_key_var: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_var: API_KEY_VAR.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(model) = env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        config
    }

    pub fn api_key(&self) -> Result<String, GeminiError> {
        env::var(&self.api_key_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GeminiError::ConfigMissing(self.api_key_var.clone()))
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if any
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

#[derive(Debug)]
pub struct GeminiService {
    config: GeminiConfig,
    client: Client,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Self {
        // No explicit timeout; the client defaults apply.
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Call `generateContent` and decode the candidates
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let api_key = self.config.api_key()?;

        debug!(
            model = %self.config.model,
            contents = request.contents.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, "Gemini request failed");
                GeminiError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "Failed to read Gemini response body");
            GeminiError::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<UpstreamErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|d| d.message)
                .unwrap_or_else(|| "Failed to reach the Gemini API".to_string());
            error!(status = status.as_u16(), message = %message, "Gemini returned an error");
            return Err(GeminiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to decode Gemini response");
            GeminiError::InvalidResponse(e.to_string())
        })?;

        info!(
            model = %self.config.model,
            candidates = parsed.candidates.len(),
            "Gemini generateContent completed"
        );

        Ok(parsed)
    }
}
