//! # Auth Module
//!
//! Boundary with the external auth/data backend:
//! - `AuthBackend` contract (session, user, role memberships, profile rows)
//! - Typed projection of loosely shaped role rows
//! - In-memory backend for local runs and tests

pub mod backend;
pub mod memory;
pub mod models;

#[cfg(test)]
mod tests;

pub use backend::{project_role_names, AuthBackend, BackendError};
pub use memory::InMemoryAuthBackend;
pub use models::{Role, Session, User};
