//! CLI interface for the resume screener

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Screen a PDF resume against a job description with an LLM")]
#[command(long_about = "Extracts the text of a PDF resume, sends it together with a job description to a chat model (OpenAI-compatible or local Ollama) and prints the model's analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one resume against one job description
    Analyze {
        /// Path to the resume PDF
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to a job description file (TXT, MD)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,
    },

    /// Interactive session: upload, replace or remove a resume and analyze repeatedly
    Session,

    /// Show or initialise configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// One line typed into an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Upload(PathBuf),
    Remove,
    Job(String),
    JobFile(PathBuf),
    Analyze,
    Status,
    Help,
    Quit,
}

pub const SESSION_HELP: &str = "\
Commands:
  upload <path>     Upload (or replace) the resume PDF
  remove            Remove the uploaded resume
  job <text>        Set the job description
  job-file <path>   Read the job description from a file
  analyze           Analyze the resume against the job description
  status            Show what the session currently holds
  help              Show this help
  quit              End the session";

pub fn parse_session_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let require = |what: &str| {
        if rest.is_empty() {
            Err(format!("'{}' needs {}", command, what))
        } else {
            Ok(rest.to_string())
        }
    };

    match command.to_lowercase().as_str() {
        "upload" => require("a file path").map(|p| SessionCommand::Upload(PathBuf::from(p))),
        "remove" => Ok(SessionCommand::Remove),
        "job" => require("the job description text").map(SessionCommand::Job),
        "job-file" => require("a file path").map(|p| SessionCommand::JobFile(PathBuf::from(p))),
        "analyze" => Ok(SessionCommand::Analyze),
        "status" => Ok(SessionCommand::Status),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        "" => Err("Empty command. Type 'help' for the list of commands.".to_string()),
        other => Err(format!("Unknown command '{}'. Type 'help' for the list of commands.", other)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
