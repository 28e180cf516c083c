// src/navigation/cache.rs
//! Short-lived per-user role cache for the navigation guard

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::Role;

#[derive(Debug, Clone)]
struct CachedRoles {
    roles: Vec<Role>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RoleCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedRoles>>,
    // Bumped on every invalidate or clear, under the entries write lock
    generation: AtomicU64,
}

impl RoleCache {
    /// A zero or negative TTL disables caching
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::zero())
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl > Duration::zero()
    }

    pub async fn get(&self, user_id: &str) -> Option<Vec<Role>> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        let cached = entries.get(user_id)?;
        if cached.expires_at > Utc::now() {
            debug!(user_id = %user_id, "Roles served from cache");
            Some(cached.roles.clone())
        } else {
            None
        }
    }

    /// Taken before a role query; pass it back to `insert`
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store roles fetched under `generation`. Results of a query that
    /// raced an invalidate or clear are dropped.
    pub async fn insert(&self, user_id: &str, roles: Vec<Role>, generation: u64) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(user_id = %user_id, "Roles fetched before invalidation, not cached");
            return;
        }

        let now = Utc::now();
        entries.retain(|_, cached| cached.expires_at > now);
        entries.insert(
            user_id.to_string(),
            CachedRoles {
                roles,
                expires_at: now + self.ttl,
            },
        );
    }

    pub async fn invalidate(&self, user_id: &str) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if entries.remove(user_id).is_some() {
            debug!(user_id = %user_id, "Cached roles invalidated");
        }
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.clear();
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}
