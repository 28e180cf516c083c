//! # Navigation Module
//!
//! Route table and the authorization guard that runs before each
//! navigation: session check, entry-point redirect, role gate.

pub mod cache;
pub mod guard;
pub mod models;
pub mod routes;


pub use guard::{GuardConfig, NavigationGuard};
pub use models::{Layout, NavigationOutcome, Route, RouteMeta};
pub use routes::{platform_routes, RouteTable};
