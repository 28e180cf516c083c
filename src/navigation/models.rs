// src/navigation/models.rs
//! Route metadata and guard outcomes

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::auth::Role;

pub const LANDING_PATH: &str = "/";
pub const AUTH_PATH: &str = "/auth";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Page chrome a route renders in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Landing,
    Auth,
    App,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub allowed_roles: Option<BTreeSet<Role>>,
    pub layout: Layout,
}

impl RouteMeta {
    pub fn public(layout: Layout) -> Self {
        Self {
            requires_auth: false,
            allowed_roles: None,
            layout,
        }
    }

    /// Signed-in area, any role
    pub fn member() -> Self {
        Self {
            requires_auth: true,
            allowed_roles: None,
            layout: Layout::App,
        }
    }

    /// Signed-in area restricted to the given roles
    pub fn restricted(roles: &[&str]) -> Self {
        Self {
            requires_auth: true,
            allowed_roles: Some(roles.iter().map(|r| Role::from(*r)).collect()),
            layout: Layout::App,
        }
    }

    /// A role gate implies authentication even when `requires_auth` is unset
    pub fn needs_session(&self) -> bool {
        self.requires_auth || self.allowed_roles.is_some()
    }

    /// The role gate, if one is set and non-empty
    pub fn role_gate(&self) -> Option<&BTreeSet<Role>> {
        self.allowed_roles.as_ref().filter(|roles| !roles.is_empty())
    }

    /// True when the user holds at least one of the gated roles
    pub fn permits(&self, user_roles: &[Role]) -> bool {
        match self.role_gate() {
            Some(required) => user_roles.iter().any(|role| required.contains(role)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    pub path: String,
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(name: &str, path: &str, meta: RouteMeta) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            meta,
        }
    }

    pub fn is_entry_point(&self) -> bool {
        self.path == AUTH_PATH || self.path == LANDING_PATH
    }
}

/// Result of guarding one navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Allow,
    RedirectAuth,
    RedirectDashboard,
    RedirectUnauthorized,
    /// A newer navigation started while this one was waiting; discard it
    Superseded,
}

impl NavigationOutcome {
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            NavigationOutcome::RedirectAuth => Some(AUTH_PATH),
            NavigationOutcome::RedirectDashboard => Some(DASHBOARD_PATH),
            NavigationOutcome::RedirectUnauthorized => Some(UNAUTHORIZED_PATH),
            NavigationOutcome::Allow | NavigationOutcome::Superseded => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, NavigationOutcome::Allow)
    }
}

/// Why a navigation was redirected. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Authentication required for {0}")]
    AuthRequired(String),

    #[error("Access to {path} requires one of {required:?}")]
    Forbidden { path: String, required: Vec<String> },
}
