//! Chat client capability shared by the remote and local transports

use crate::config::{Config, Provider};
use crate::error::{Result, ScreenerError};
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One system turn and one user turn, built fresh for every call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system_prompt.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user_message.clone(),
            },
        ]
    }
}

/// Send a user message, get the model's reply.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(&self, user_message: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Settings common to both transports.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub model_name: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl ClientSettings {
    pub fn new(model_name: &str, system_prompt: Option<&str>, temperature: f32) -> Result<Self> {
        if model_name.trim().is_empty() {
            return Err(ScreenerError::Configuration("Model name cannot be empty.".to_string()));
        }

        let system_prompt = system_prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .to_string();

        Ok(Self {
            model_name: model_name.to_string(),
            system_prompt,
            temperature,
            timeout_secs: 120,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Reject empty messages before any transport work happens.
    pub fn request(&self, user_message: &str) -> Result<ChatRequest> {
        if user_message.is_empty() {
            log::warn!("Attempted to send an empty user message.");
            return Err(ScreenerError::InvalidInput("User message cannot be empty.".to_string()));
        }

        Ok(ChatRequest {
            system_prompt: self.system_prompt.clone(),
            user_message: user_message.to_string(),
            temperature: self.temperature,
        })
    }
}

/// Pick the transport named by the configuration and connect it.
pub async fn connect(config: &Config, system_prompt: Option<&str>) -> Result<Box<dyn ChatClient>> {
    let settings = ClientSettings::new(&config.llm.model, system_prompt, config.llm.temperature)?
        .with_timeout(config.llm.timeout_secs);

    match config.llm.provider {
        Provider::Remote => {
            let api_key = config.llm.api_key.as_deref().unwrap_or_default();
            let client = OpenAiClient::new(settings, api_key, config.base_url())?;
            Ok(Box::new(client))
        }
        Provider::Local => {
            let client = OllamaClient::connect(settings, &config.llm.ollama_host).await?;
            Ok(Box::new(client))
        }
    }
}

/// First `max_chars` characters, for log lines.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
