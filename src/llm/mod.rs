//! OpenAI-compatible chat-completion backend (DeepSeek by default).

pub mod client;
pub mod types;
