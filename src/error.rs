//! Error handling for the resume screener

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create temporary directory {}: {source}", path.display())]
    TempDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error processing PDF: {0}")]
    PdfExtraction(String),

    #[error("Prompt '{0}' not found in prompt store")]
    PromptNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Connectivity(String),

    #[error("{provider} API error: {status} - {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Received an unexpected response structure from {provider}: {detail}")]
    UnexpectedResponse {
        provider: &'static str,
        detail: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScreenerError {
    /// Errors that block every later extraction in the session.
    pub fn is_resource(&self) -> bool {
        matches!(self, ScreenerError::TempDir { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScreenerError>;
