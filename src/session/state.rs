//! Per-session record of the upload and analysis results

/// Owned by one session only; never shared between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub uploaded_file_identity: Option<String>,
    pub extracted_text: Option<String>,
    pub last_response: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    HasText,
    HasResponse,
    Error,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Empty => write!(f, "empty"),
            SessionPhase::HasText => write!(f, "resume loaded"),
            SessionPhase::HasResponse => write!(f, "analysis ready"),
            SessionPhase::Error => write!(f, "error"),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.last_response.is_some() {
            SessionPhase::HasResponse
        } else if self.last_error.is_some() {
            SessionPhase::Error
        } else if self.has_text() {
            SessionPhase::HasText
        } else {
            SessionPhase::Empty
        }
    }

    pub fn has_text(&self) -> bool {
        self.extracted_text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// A different file, or the same one whose text was never obtained.
    pub fn needs_extraction(&self, identity: &str) -> bool {
        self.uploaded_file_identity.as_deref() != Some(identity) || !self.has_text()
    }

    /// Start over with a new file: everything derived from the old one goes.
    pub fn begin_upload(&mut self, identity: &str) {
        self.extracted_text = None;
        self.last_response = None;
        self.last_error = None;
        self.uploaded_file_identity = Some(identity.to_string());
    }

    pub fn record_text(&mut self, text: String) {
        self.extracted_text = Some(text);
    }

    pub fn clear_results(&mut self) {
        self.last_response = None;
        self.last_error = None;
    }

    pub fn record_response(&mut self, response: String) {
        self.last_error = None;
        self.last_response = Some(response);
    }

    pub fn record_error(&mut self, error: String) {
        self.last_response = None;
        self.last_error = Some(error);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
