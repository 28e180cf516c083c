// src/services/mod.rs
//
// Clients for the external services the platform talks to

pub mod gemini;
pub mod supabase;

// Re-export commonly used types for convenience
pub use gemini::{GeminiConfig, GeminiError, GeminiService};
pub use supabase::{SupabaseClient, SupabaseConfig};
