//! Named prompt templates loaded from a TOML resource

use crate::error::{Result, ScreenerError};
use log::{error, info, warn};
use std::collections::HashMap;
use std::path::Path;

pub const JOB_DESCRIPTION_PLACEHOLDER: &str = "{{ job_description }}";
pub const CANDIDATE_RESUME_PLACEHOLDER: &str = "{{ candidate_resume }}";

/// Immutable mapping from prompt name to template text.
///
/// A missing or malformed resource is logged and yields an empty store, so the
/// failure surfaces at lookup time as [`ScreenerError::PromptNotFound`].
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    templates: HashMap<String, String>,
}

impl PromptStore {
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Prompt file '{}' not found.", path.display());
                return Self::default();
            }
            Err(e) => {
                error!("Error reading prompt file '{}': {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::parse(&content) {
            Ok(store) => {
                info!("Loaded {} prompt(s) from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                error!("Error parsing prompt file '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Top-level string values become templates; anything else is skipped.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        let mut templates = HashMap::new();

        for (name, value) in table {
            match value {
                toml::Value::String(template) => {
                    templates.insert(name, template);
                }
                other => warn!(
                    "Ignoring prompt '{}': expected a string, found {}",
                    name,
                    other.type_str()
                ),
            }
        }

        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ScreenerError::PromptNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Fill the user prompt template.
///
/// Plain sequential replacement with no escaping: the job description is
/// substituted first, so a placeholder token inside it is then replaced by the
/// resume text.
pub fn render_user_prompt(template: &str, job_description: &str, resume_text: &str) -> String {
    template
        .replace(JOB_DESCRIPTION_PLACEHOLDER, job_description)
        .replace(CANDIDATE_RESUME_PLACEHOLDER, resume_text)
}
