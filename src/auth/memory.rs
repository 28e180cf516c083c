//! In-memory auth backend for local runs and tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use super::backend::{AuthBackend, BackendError};
use super::models::{Session, User};

#[derive(Debug, Default)]
pub struct InMemoryAuthBackend {
    session: RwLock<Option<Session>>,
    user: RwLock<Option<User>>,
    role_rows: RwLock<HashMap<String, Vec<Value>>>,
    profiles: RwLock<HashMap<String, Value>>,
    role_delay: RwLock<Option<Duration>>,
    fail_sessions: AtomicBool,
    fail_roles: AtomicBool,
    role_queries: AtomicUsize,
}

impl InMemoryAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, user_id: &str, email: Option<&str>) {
        *self.session.write().await = Some(Session::new(format!("token-{}", user_id), user_id));
        *self.user.write().await = Some(User {
            id: user_id.to_string(),
            email: email.map(str::to_string),
        });
    }

    pub async fn sign_out(&self) {
        *self.session.write().await = None;
        *self.user.write().await = None;
    }

    pub async fn set_roles(&self, user_id: &str, roles: &[&str]) {
        let rows = roles
            .iter()
            .map(|name| json!({ "roles": { "name": name } }))
            .collect();
        self.set_role_rows(user_id, rows).await;
    }

    pub async fn set_role_rows(&self, user_id: &str, rows: Vec<Value>) {
        self.role_rows.write().await.insert(user_id.to_string(), rows);
    }

    pub async fn set_profile(&self, user_id: &str, profile: Value) {
        self.profiles.write().await.insert(user_id.to_string(), profile);
    }

    pub async fn set_role_delay(&self, delay: Option<Duration>) {
        *self.role_delay.write().await = delay;
    }

    pub fn fail_session_lookups(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    pub fn fail_role_queries(&self, fail: bool) {
        self.fail_roles.store(fail, Ordering::SeqCst);
    }

    pub fn role_query_count(&self) -> usize {
        self.role_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuthBackend {
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(BackendError::RequestFailed("session lookup unavailable".into()));
        }
        Ok(self.session.read().await.clone())
    }

    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(BackendError::RequestFailed("user lookup unavailable".into()));
        }
        Ok(self.user.read().await.clone())
    }

    async fn fetch_role_rows(&self, user_id: &str) -> Result<Vec<Value>, BackendError> {
        self.role_queries.fetch_add(1, Ordering::SeqCst);

        // Rows are read when the query starts; the delay models the round trip
        let rows = self
            .role_rows
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default();

        let delay = *self.role_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_roles.load(Ordering::SeqCst) {
            return Err(BackendError::RequestFailed("role query unavailable".into()));
        }

        Ok(rows)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Value>, BackendError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}
