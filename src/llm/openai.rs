//! Remote chat transport: any OpenAI-compatible `/chat/completions` endpoint

use crate::error::{Result, ScreenerError};
use crate::llm::client::{preview, ChatClient, ChatMessage, ClientSettings};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct OpenAiClient {
    http: Client,
    settings: ClientSettings,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(settings: ClientSettings, api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ScreenerError::Configuration("API key cannot be empty.".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                error!("Failed to initialize OpenAI client: {}", e);
                ScreenerError::Connectivity(format!(
                    "Could not initialize OpenAI client. Details: {}",
                    e
                ))
            })?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!(
            "OpenAI client initialized for model: {} at URL: {}",
            settings.model_name, base_url
        );

        Ok(Self {
            http,
            settings,
            api_key: api_key.to_string(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn send(&self, user_message: &str) -> Result<String> {
        let request = self.settings.request(user_message)?;
        let body = CompletionRequest {
            model: &self.settings.model_name,
            messages: request.messages(),
            temperature: request.temperature,
        };

        info!("Sending message to OpenAI model {}", self.settings.model_name);
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "OpenAI request failed for model {}: {:?}",
                    self.settings.model_name, e
                );
                ScreenerError::Connectivity(format!("Could not reach {}: {}", self.base_url, e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read OpenAI response body: {:?}", e);
            ScreenerError::Connectivity(format!("Connection dropped while reading response: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            error!(
                "OpenAI API error for model {}: {} - {}",
                self.settings.model_name,
                status.as_u16(),
                message
            );
            return Err(ScreenerError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Unparseable response from OpenAI: {}", e);
            ScreenerError::UnexpectedResponse {
                provider: PROVIDER,
                detail: e.to_string(),
            }
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                error!("Unexpected response structure from OpenAI: {}", preview(&text, 500));
                ScreenerError::UnexpectedResponse {
                    provider: PROVIDER,
                    detail: "missing message content in first choice".to_string(),
                }
            })?;

        info!(
            "Received response from OpenAI model {}: '{}'",
            self.settings.model_name,
            preview(&content, 100)
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.settings.model_name
    }
}
