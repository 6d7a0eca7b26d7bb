//! Local chat transport: an Ollama daemon reached without authentication

use crate::error::{Result, ScreenerError};
use crate::llm::client::{preview, ChatClient, ChatMessage, ClientSettings};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "Ollama";
const PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Strip trailing slashes and an OpenAI-style `/v1` suffix.
fn normalize_host(host: &str) -> String {
    let mut host = host.trim_end_matches('/').to_string();
    if host.ends_with("/v1") {
        host.truncate(host.len() - 3);
    }
    host
}

pub struct OllamaClient {
    http: Client,
    settings: ClientSettings,
    host: String,
}

impl OllamaClient {
    /// Build the client and check that the daemon answers.
    pub async fn connect(settings: ClientSettings, host: &str) -> Result<Self> {
        let host = normalize_host(host);
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                error!("Failed to initialize Ollama client: {}", e);
                ScreenerError::Connectivity(format!(
                    "Could not connect to Ollama. Ensure Ollama is running. Details: {}",
                    e
                ))
            })?;

        let probe = http
            .get(format!("{}/api/version", host))
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await
            .and_then(|response| response.error_for_status());

        if let Err(e) = probe {
            error!("Failed to reach Ollama at {}: {:?}", host, e);
            return Err(ScreenerError::Connectivity(format!(
                "Could not connect to Ollama. Ensure Ollama is running. Details: {}",
                e
            )));
        }

        info!("Ollama client initialized for model: {}", settings.model_name);
        Ok(Self {
            http,
            settings,
            host,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn send(&self, user_message: &str) -> Result<String> {
        let request = self.settings.request(user_message)?;
        let body = OllamaChatRequest {
            model: &self.settings.model_name,
            messages: request.messages(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        };

        info!("Sending message to Ollama model {}", self.settings.model_name);
        let response = self
            .http
            .post(format!("{}/api/chat", self.host))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "Ollama request failed for model {}: {:?}",
                    self.settings.model_name, e
                );
                ScreenerError::Connectivity(format!("Could not reach Ollama at {}: {}", self.host, e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read Ollama response body: {:?}", e);
            ScreenerError::Connectivity(format!("Connection dropped while reading response: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<OllamaError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            error!(
                "Ollama API ResponseError for model {}: {} - {}",
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

        let parsed: OllamaChatResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Unparseable response from Ollama: {}", e);
            ScreenerError::UnexpectedResponse {
                provider: PROVIDER,
                detail: e.to_string(),
            }
        })?;

        let content = parsed
            .message
            .and_then(|message| message.content)
            .ok_or_else(|| {
                error!("Unexpected response structure from Ollama: {}", preview(&text, 500));
                ScreenerError::UnexpectedResponse {
                    provider: PROVIDER,
                    detail: "missing message content".to_string(),
                }
            })?;

        info!(
            "Received response from Ollama model {}: '{}'",
            self.settings.model_name,
            preview(&content, 100)
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.settings.model_name
    }
}
