//! Learning platform core: navigation guard, client state containers
//! (user profile, wallet payments, theme) and the Gemini proxy service.

pub mod ai;
pub mod auth;
pub mod client;
pub mod common;
pub mod logging_middleware;
pub mod navigation;
pub mod profile;
pub mod router;
pub mod services;
pub mod theme;
pub mod wallet;
