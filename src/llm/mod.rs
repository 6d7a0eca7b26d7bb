//! LLM integration module

pub mod client;
pub mod ollama;
pub mod openai;
pub mod prompts;
