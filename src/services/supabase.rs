// src/services/supabase.rs
//
// REST adapter for the hosted auth/data backend (GoTrue + PostgREST).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::env;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::auth::{AuthBackend, BackendError, Session, User};
use crate::common::safe_token_log;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// `None` when `SUPABASE_URL` or `SUPABASE_ANON_KEY` is missing
    pub fn from_env() -> Option<Self> {
        let url = env::var("SUPABASE_URL").ok().filter(|v| !v.trim().is_empty())?;
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        Some(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

#[derive(Debug)]
pub struct SupabaseClient {
    config: SupabaseConfig,
    client: Client,
    session: RwLock<Option<Session>>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self {
            config,
            client,
            session: RwLock::new(None),
        }
    }

    /// Store the session handed over by the sign-in flow
    pub async fn set_session(&self, session: Session) {
        debug!(
            user_id = %session.user_id,
            token = %safe_token_log(&session.access_token),
            "Session stored"
        );
        *self.session.write().await = Some(session);
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone().filter(|s| !s.is_expired())
    }

    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = match self.current_session().await {
            Some(session) => session.access_token,
            None => self.config.anon_key.clone(),
        };
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn select_rows(&self, table: &str, query: &str) -> Result<Vec<Value>, BackendError> {
        let url = format!("{}/rest/v1/{}?{}", self.config.url, table, query);
        let response = self
            .authorized(self.client.get(url))
            .await
            .send()
            .await
            .map_err(|e| {
                error!(table = %table, error = %e, "Backend select failed");
                BackendError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(table = %table, status = status.as_u16(), "Backend select rejected");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthBackend for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        Ok(self.current_session().await)
    }

    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        let Some(session) = self.current_session().await else {
            return Ok(None);
        };

        let url = format!("{}/auth/v1/user", self.config.url);
        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "User lookup failed");
                BackendError::RequestFailed(e.to_string())
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(user_id = %session.user_id, "Session rejected by auth backend");
                Ok(None)
            }
            status if status.is_success() => response
                .json::<User>()
                .await
                .map(Some)
                .map_err(|e| BackendError::InvalidResponse(e.to_string())),
            status => Err(BackendError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn fetch_role_rows(&self, user_id: &str) -> Result<Vec<Value>, BackendError> {
        let query = format!(
            "select=roles(name)&user_id=eq.{}",
            urlencoding::encode(user_id)
        );
        self.select_rows("user_roles", &query).await
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Value>, BackendError> {
        let query = format!("select=*&id=eq.{}", urlencoding::encode(user_id));
        let rows = self.select_rows("profiles", &query).await?;
        Ok(rows.into_iter().next())
    }
}
