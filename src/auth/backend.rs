//! Contract with the external auth/data backend

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{Role, RoleMembershipRow, Session, User};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Session, user and role-membership lookups
///
/// Implementations are free to hit the network on every call; callers that
/// want caching layer it on top.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    async fn get_user(&self) -> Result<Option<User>, BackendError>;

    /// Raw `user_roles` rows joined to `roles(name)`
    async fn fetch_role_rows(&self, user_id: &str) -> Result<Vec<Value>, BackendError>;

    /// Raw `profiles` row for the user
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Value>, BackendError>;

    async fn query_role_names(&self, user_id: &str) -> Result<Vec<Role>, BackendError> {
        let rows = self.fetch_role_rows(user_id).await?;
        Ok(project_role_names(user_id, rows))
    }
}

/// Typed projection of membership rows into role names.
///
/// Keeps backend order, drops duplicates, logs and skips malformed rows.
pub fn project_role_names(user_id: &str, rows: Vec<Value>) -> Vec<Role> {
    let mut roles: Vec<Role> = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let parsed = match serde_json::from_value::<RoleMembershipRow>(row) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(user_id = %user_id, row = index, error = %e, "Skipping malformed role row");
                continue;
            }
        };

        let names = parsed.names();
        if names.is_empty() {
            warn!(user_id = %user_id, row = index, "Role row carries no role name");
            continue;
        }

        for name in names {
            let role = Role::from(name);
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
    }

    debug!(user_id = %user_id, roles = ?roles, "Projected role memberships");
    roles
}
