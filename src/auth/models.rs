//! Authentication data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_MENTOR: &str = "mentor";
pub const ROLE_FREELANCER: &str = "freelancer";

/// Named permission grouping assigned to a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proof of an authenticated user, issued by the auth backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: user_id.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// User as returned by the auth backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// One row of the `user_roles` join, `select=roles(name)`
///
/// The relation comes back as an object or, for to-many joins, an array.
#[derive(Debug, Deserialize)]
pub struct RoleMembershipRow {
    pub roles: Option<RoleRelation>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoleRelation {
    One(RoleRef),
    Many(Vec<RoleRef>),
}

#[derive(Debug, Deserialize)]
pub struct RoleRef {
    pub name: Option<String>,
}

impl RoleMembershipRow {
    /// Role names carried by this row; empty when the row is malformed
    pub fn names(&self) -> Vec<&str> {
        let refs: Vec<&RoleRef> = match &self.roles {
            Some(RoleRelation::One(r)) => vec![r],
            Some(RoleRelation::Many(rs)) => rs.iter().collect(),
            None => Vec::new(),
        };
        refs.into_iter()
            .filter_map(|r| r.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}
