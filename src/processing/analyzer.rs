//! Resume analysis against a job description

use crate::error::ScreenerError;
use crate::llm::client::ChatClient;
use crate::llm::prompts::{render_user_prompt, PromptStore};
use log::{error, info, warn};

/// Either the model's analysis or a one-line message fit for the user.
pub type AnalysisOutcome = std::result::Result<String, String>;

pub struct AnalysisService {
    client: Box<dyn ChatClient>,
    prompts: PromptStore,
    user_prompt_key: String,
}

impl AnalysisService {
    pub fn new(client: Box<dyn ChatClient>, prompts: PromptStore, user_prompt_key: impl Into<String>) -> Self {
        Self {
            client,
            prompts,
            user_prompt_key: user_prompt_key.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Never fails past this boundary: every error becomes a message.
    pub async fn analyze(&self, job_description: &str, resume_text: &str) -> AnalysisOutcome {
        if job_description.is_empty() {
            warn!("Job description is empty. Cannot perform analysis.");
            return Err("Job description cannot be empty".to_string());
        }
        if resume_text.is_empty() {
            warn!("Resume text is empty. Cannot perform analysis.");
            return Err("Resume text cannot be empty".to_string());
        }

        let template = self.prompts.get(&self.user_prompt_key).map_err(|e| {
            error!("Cannot build analysis prompt: {}", e);
            describe_failure(&e)
        })?;
        let prompt = render_user_prompt(template, job_description, resume_text);

        match self.client.send(&prompt).await {
            Ok(response) => {
                info!("Successfully received AI analysis from LLM client.");
                Ok(response)
            }
            Err(e) => {
                error!("LLM client error during analysis: {:?}", e);
                Err(describe_failure(&e))
            }
        }
    }
}

fn describe_failure(err: &ScreenerError) -> String {
    match err {
        ScreenerError::Connectivity(_) => format!("Could not connect to AI service: {}", err),
        ScreenerError::InvalidInput(_) => format!("AI input error: {}", err),
        ScreenerError::Api { .. } | ScreenerError::UnexpectedResponse { .. } => {
            format!("AI communication error: {}", err)
        }
        _ => format!("Unexpected AI analysis error: {}", err),
    }
}
