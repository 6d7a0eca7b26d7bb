//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const SYSTEM_PROMPT_KEY: &str = "talent_acquisition_assistant_system_prompt";
pub const USER_PROMPT_KEY: &str = "talent_acquisition_assistant_user_prompt";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub prompts: PromptConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub base_url: Option<String>,
    /// Only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub ollama_host: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Hosted OpenAI-compatible chat completions endpoint
    Remote,
    /// Ollama daemon on this machine
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub path: PathBuf,
    pub system_prompt_key: String,
    pub user_prompt_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub temp_dir: PathBuf,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Remote,
            model: String::new(),
            base_url: None,
            api_key: None,
            temperature: 0.1,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("prompts.toml"),
            system_prompt_key: SYSTEM_PROMPT_KEY.to_string(),
            user_prompt_key: USER_PROMPT_KEY.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir()
                .join("resume-screener")
                .join("uploads"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "openai" => Ok(Provider::Remote),
            "local" | "ollama" => Ok(Provider::Local),
            other => Err(ScreenerError::Configuration(format!(
                "Unknown LLM provider '{}'. Supported: remote, local",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Remote => write!(f, "remote"),
            Provider::Local => write!(f, "local"),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file (if present), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            if path.is_some() {
                return Err(ScreenerError::Configuration(format!(
                    "Config file not found: {}",
                    config_path.display()
                )));
            }
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Overlay values from `lookup`; empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get("LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(model) = get("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(api_key) = get("LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }
        if let Some(base_url) = get("LLM_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }
        if let Some(temperature) = get("LLM_TEMPERATURE") {
            self.llm.temperature = temperature.trim().parse().map_err(|_| {
                ScreenerError::Configuration(format!(
                    "LLM_TEMPERATURE must be a number, got '{}'",
                    temperature
                ))
            })?;
        }
        if let Some(host) = get("OLLAMA_HOST") {
            self.llm.ollama_host = host;
        }
        if let Some(prompts) = get("PROMPTS_PATH") {
            self.prompts.path = PathBuf::from(prompts);
        }
        if let Some(temp_dir) = get("RESUME_SCREENER_TEMP_DIR") {
            self.storage.temp_dir = PathBuf::from(temp_dir);
        }

        Ok(())
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Serialization(format!("config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn base_url(&self) -> &str {
        self.llm
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match &self.llm.api_key {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{}", tail)
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }
}
