// src/ai/models.rs
//! Request/response types and prompt shaping for the AI proxy endpoints

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::services::gemini::{Content, GenerateContentRequest, GenerationConfig, Part};

pub const CHAT_FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble thinking right now. Please try again later.";
pub const CHAT_TEMPERATURE: f32 = 0.7;
pub const CHAT_MAX_OUTPUT_TOKENS: u32 = 1000;

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Upstream only knows `user` and `model`
    pub fn to_content(&self) -> Content {
        let role = if self.role == "user" { "user" } else { "model" };
        Content {
            role: Some(role.to_string()),
            parts: vec![Part::text(self.content.clone())],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn to_upstream(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.messages.iter().map(ChatMessage::to_content).collect(),
            generation_config: Some(GenerationConfig {
                temperature: CHAT_TEMPERATURE,
                max_output_tokens: CHAT_MAX_OUTPUT_TOKENS,
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

// ============================================================================
// Roadmap
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RoadmapRequest {
    pub topic: String,
}

impl RoadmapRequest {
    pub fn to_upstream(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(roadmap_prompt(&self.topic))],
            }],
            generation_config: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoadmapResponse {
    pub roadmap: String,
}

pub fn roadmap_prompt(topic: &str) -> String {
    format!(
        r#"Act as a senior developer and mentor.
Create a learning roadmap for the topic: "{topic}".

MANDATORY RULES:
1. The output must ONLY be MERMAID.JS flowchart code (graph TD).
2. Do NOT use markdown code blocks (no ``` fences).
3. No opening or closing sentences. Mermaid code only.
4. Flow from Beginner --> Intermediate --> Advanced.

Example of a correct output:
graph TD
  A[Start] --> B[Basics]
  B --> C[Advanced]
"#
    )
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:mermaid)?").expect("fence pattern is valid"))
}

/// Remove markdown fence markers the model adds despite the prompt
pub fn strip_code_fences(text: &str) -> String {
    fence_pattern().replace_all(text, "").trim().to_string()
}
