// src/profile/models.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::auth::Role;

/// Typed projection of a `profiles` row. Columns without a field here are
/// kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Full name, then username, then the id
    pub fn display_name(&self) -> &str {
        [self.full_name.as_deref(), self.username.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Learner,
    Creator,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Learner => Mode::Creator,
            Mode::Creator => Mode::Learner,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Learner => f.write_str("learner"),
            Mode::Creator => f.write_str("creator"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub user_id: Option<String>,
    pub profile: Option<Profile>,
    pub roles: Vec<Role>,
    pub mode: Mode,
}
