// src/navigation/guard.rs
//! Route authorization guard, run before every navigation

use chrono::Duration;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cache::RoleCache;
use super::models::{NavigationError, NavigationOutcome, Route};
use super::routes::RouteTable;
use crate::auth::{AuthBackend, Role, Session};

/// One day; longer TTLs are cut down to this
const MAX_ROLE_CACHE_TTL_SECS: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub role_cache_ttl_secs: i64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            role_cache_ttl_secs: 30,
        }
    }
}

impl GuardConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // ROLE_CACHE_TTL_SECS - 0 refetches roles on every guarded navigation
        if let Ok(ttl) = env::var("ROLE_CACHE_TTL_SECS") {
            if let Ok(val) = ttl.parse::<i64>() {
                config.role_cache_ttl_secs = val;
            }
        }

        config
    }
}

pub struct NavigationGuard {
    backend: Arc<dyn AuthBackend>,
    cache: RoleCache,
    latest: AtomicU64,
}

impl NavigationGuard {
    pub fn new(backend: Arc<dyn AuthBackend>, config: &GuardConfig) -> Self {
        Self {
            backend,
            cache: RoleCache::new(Duration::seconds(
                config.role_cache_ttl_secs.clamp(0, MAX_ROLE_CACHE_TTL_SECS),
            )),
            latest: AtomicU64::new(0),
        }
    }

    /// Decide whether navigation to `to` may proceed.
    ///
    /// Each call takes a fresh navigation token. When a newer navigation has
    /// started by the time this one finishes, the result is `Superseded`.
    pub async fn resolve(&self, to: &Route) -> NavigationOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = self.evaluate(to).await;

        if self.latest.load(Ordering::SeqCst) != token {
            debug!(path = %to.path, token, "Navigation superseded by a newer one");
            return NavigationOutcome::Superseded;
        }

        outcome
    }

    /// Convenience wrapper resolving a raw path against a route table
    pub async fn resolve_path(&self, routes: &RouteTable, path: &str) -> NavigationOutcome {
        let route = routes.resolve(path);
        self.resolve(&route).await
    }

    pub async fn invalidate_roles(&self, user_id: &str) {
        self.cache.invalidate(user_id).await;
    }

    pub async fn clear_role_cache(&self) {
        self.cache.clear().await;
    }

    async fn evaluate(&self, to: &Route) -> NavigationOutcome {
        let session = self.current_session().await;

        // auth-check
        if to.meta.needs_session() && session.is_none() {
            info!(error = %NavigationError::AuthRequired(to.path.clone()), "Redirecting to sign in");
            return NavigationOutcome::RedirectAuth;
        }

        if to.is_entry_point() && session.is_some() {
            debug!(path = %to.path, "Signed-in user sent to dashboard");
            return NavigationOutcome::RedirectDashboard;
        }

        // role-check
        if let (Some(required), Some(session)) = (to.meta.role_gate(), session.as_ref()) {
            let roles = self.roles_for(&session.user_id).await;
            if !to.meta.permits(&roles) {
                let err = NavigationError::Forbidden {
                    path: to.path.clone(),
                    required: required.iter().map(Role::to_string).collect(),
                };
                info!(user_id = %session.user_id, error = %err, "Redirecting to unauthorized");
                return NavigationOutcome::RedirectUnauthorized;
            }
        }

        NavigationOutcome::Allow
    }

    /// Session lookup failures count as signed out
    async fn current_session(&self) -> Option<Session> {
        match self.backend.get_session().await {
            Ok(session) => session.filter(|s| !s.is_expired()),
            Err(e) => {
                warn!(error = %e, "Session lookup failed, treating as signed out");
                None
            }
        }
    }

    /// Role lookup failures count as no roles, so gated routes stay closed
    async fn roles_for(&self, user_id: &str) -> Vec<Role> {
        if let Some(roles) = self.cache.get(user_id).await {
            return roles;
        }

        let generation = self.cache.generation();
        match self.backend.query_role_names(user_id).await {
            Ok(roles) => {
                self.cache.insert(user_id, roles.clone(), generation).await;
                roles
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Role lookup failed, denying role-gated access");
                Vec::new()
            }
        }
    }
}
