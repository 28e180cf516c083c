// src/profile/store.rs
//! Current user's profile, roles and learner/creator mode

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::models::{Mode, Profile, UserState};
use crate::auth::{AuthBackend, BackendError, Role};

#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn AuthBackend>,
    state: Arc<RwLock<UserState>>,
    fetch_seq: Arc<AtomicU64>,
}

impl UserStore {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(UserState::default())),
            fetch_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Load profile and roles for the signed-in user, or clear both when
    /// nobody is signed in. Only a failed user lookup is an error; profile
    /// and role failures are logged and leave those fields empty.
    pub async fn fetch_user_data(&self) -> Result<(), BackendError> {
        let token = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let user = self.backend.get_user().await?;

        let (user_id, profile, roles) = match user {
            Some(user) => {
                let profile = self.load_profile(&user.id).await;
                let roles = match self.backend.query_role_names(&user.id).await {
                    Ok(roles) => roles,
                    Err(e) => {
                        warn!(user_id = %user.id, error = %e, "Failed to load user roles");
                        Vec::new()
                    }
                };
                (Some(user.id), profile, roles)
            }
            None => (None, None, Vec::new()),
        };

        let mut state = self.state.write().await;
        if self.fetch_seq.load(Ordering::SeqCst) != token {
            debug!(token, "Discarding stale user data");
            return Ok(());
        }

        info!(
            user_id = user_id.as_deref().unwrap_or("-"),
            roles = roles.len(),
            "User data loaded"
        );
        state.user_id = user_id;
        state.profile = profile;
        state.roles = roles;
        Ok(())
    }

    pub async fn has_role(&self, name: &str) -> bool {
        self.state
            .read()
            .await
            .roles
            .iter()
            .any(|role| role.as_str() == name)
    }

    /// Flip between learner and creator, returning the new mode
    pub async fn toggle_mode(&self) -> Mode {
        let mut state = self.state.write().await;
        state.mode = state.mode.toggled();
        state.mode
    }

    pub async fn state(&self) -> UserState {
        self.state.read().await.clone()
    }

    pub async fn user_id(&self) -> Option<String> {
        self.state.read().await.user_id.clone()
    }

    pub async fn profile(&self) -> Option<Profile> {
        self.state.read().await.profile.clone()
    }

    pub async fn roles(&self) -> Vec<Role> {
        self.state.read().await.roles.clone()
    }

    pub async fn mode(&self) -> Mode {
        self.state.read().await.mode
    }

    /// Drop profile and roles, keeping the mode
    pub async fn clear(&self) {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        state.user_id = None;
        state.profile = None;
        state.roles.clear();
    }

    async fn load_profile(&self, user_id: &str) -> Option<Profile> {
        let row = match self.backend.fetch_profile(user_id).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                debug!(user_id = %user_id, "No profile row");
                return None;
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load profile");
                return None;
            }
        };

        match serde_json::from_value::<Profile>(row) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Skipping malformed profile row");
                None
            }
        }
    }
}
