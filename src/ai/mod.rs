// src/ai/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;


// Re-export commonly used items
pub use models::*;
pub use routes::ai_routes;
