//! Interaction controller: drives a session through upload, extraction and analysis
//!
//! Every handler takes the current [`SessionState`] by value and hands back the
//! next state together with the notices the front end should display, in the
//! order they happened. Rendering stays with the caller.

use crate::input::pdf_service::PdfService;
use crate::processing::analyzer::AnalysisService;
use crate::session::state::SessionState;
use log::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Identity used to detect a changed upload.
    pub fn identity(&self) -> &str {
        &self.name
    }
}

/// What the user presented in one round of interaction.
#[derive(Debug, Clone, Copy)]
pub struct InputCycle<'a> {
    pub file: Option<&'a UploadedFile>,
    pub job_description: &'a str,
    pub analyze: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Status(String),
    Progress(String),
    Success(String),
    Error(String),
    Warning(String),
    /// Final model output, Markdown formatted.
    Response(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub notices: Vec<Notice>,
}

impl Transition {
    fn unchanged(state: SessionState) -> Self {
        Self {
            state,
            notices: Vec::new(),
        }
    }
}

pub struct InteractionController {
    pdf: PdfService,
    analysis: AnalysisService,
}

impl InteractionController {
    pub fn new(pdf: PdfService, analysis: AnalysisService) -> Self {
        Self { pdf, analysis }
    }

    pub fn pdf_service(&self) -> &PdfService {
        &self.pdf
    }

    pub fn model_name(&self) -> &str {
        self.analysis.model_name()
    }

    /// File step, then analysis if requested, then the result display.
    pub async fn run_cycle(&self, state: SessionState, cycle: InputCycle<'_>) -> Transition {
        let Transition { state, mut notices } = self.on_file(state, cycle.file);

        let state = if cycle.analyze {
            let analyzed = self.on_analyze(state, cycle.job_description).await;
            notices.extend(analyzed.notices);
            analyzed.state
        } else {
            state
        };

        notices.extend(Self::results(&state));
        Transition { state, notices }
    }

    pub fn on_file(&self, mut state: SessionState, file: Option<&UploadedFile>) -> Transition {
        match file {
            Some(file) if state.needs_extraction(file.identity()) => {
                state.begin_upload(file.identity());
                info!("Processing uploaded file: {}", file.name);

                let mut notices = Vec::new();
                if !file.name.to_lowercase().ends_with(".pdf") {
                    notices.push(Notice::Warning(format!(
                        "'{}' does not have a .pdf extension; trying to read it as a PDF anyway.",
                        file.name
                    )));
                }
                notices.push(Notice::Progress(format!(
                    "Extracting text from '{}'...",
                    file.name
                )));

                match self.pdf.extract(&file.bytes, &file.name) {
                    Ok(text) => {
                        notices.push(Notice::Success(format!(
                            "Successfully extracted text from '{}'.",
                            file.name
                        )));
                        state.record_text(text);
                    }
                    Err(e) if e.is_resource() => {
                        error!("File storage unavailable while processing {}: {}", file.name, e);
                        notices.push(Notice::Error(format!("File processing system error: {}", e)));
                        state.record_error(format!("File system error: {}", e));
                    }
                    Err(e) => {
                        let message = e.to_string();
                        notices.push(Notice::Error(message.clone()));
                        state.record_error(message);
                    }
                }

                Transition { state, notices }
            }
            Some(_) => Transition::unchanged(state),
            None => match state.uploaded_file_identity.clone() {
                Some(previous) => {
                    info!("File '{}' was removed by the user.", previous);
                    state.reset();
                    Transition {
                        state,
                        notices: vec![Notice::Status(format!("Removed '{}'.", previous))],
                    }
                }
                None => Transition::unchanged(state),
            },
        }
    }

    /// Runs the analysis only when text and a job description are both present;
    /// otherwise the state is returned untouched with a warning.
    pub async fn on_analyze(&self, mut state: SessionState, job_description: &str) -> Transition {
        if !state.has_text() {
            warn!("Analyze requested but no extracted text available.");
            return Transition {
                state,
                notices: vec![Notice::Warning(
                    "Please upload and process a resume PDF before analyzing.".to_string(),
                )],
            };
        }
        if job_description.is_empty() {
            warn!("Analyze requested but no job description provided.");
            return Transition {
                state,
                notices: vec![Notice::Warning(
                    "Please provide a job description before analyzing.".to_string(),
                )],
            };
        }

        state.clear_results();
        info!("Starting AI analysis.");
        let mut notices = vec![Notice::Progress(format!(
            "Analyzing with {}... This may take a moment.",
            self.model_name()
        ))];

        let resume_text = state.extracted_text.clone().unwrap_or_default();
        match self.analysis.analyze(job_description, &resume_text).await {
            Ok(response) => {
                info!("Stored AI analysis response.");
                state.record_response(response);
            }
            Err(message) => {
                notices.push(Notice::Error(format!("AI Analysis Error: {}", message)));
                state.record_error(message);
            }
        }

        Transition { state, notices }
    }

    /// A stored response always wins over a stale error.
    pub fn results(state: &SessionState) -> Option<Notice> {
        if let Some(response) = &state.last_response {
            Some(Notice::Response(response.clone()))
        } else {
            state.last_error.as_ref().map(|error| {
                Notice::Warning(format!("Could not complete the process due to: {}", error))
            })
        }
    }
}
