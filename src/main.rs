//! Resume screener: LLM-assisted resume screening against a job description

use anyhow::{anyhow, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, SessionCommand};
use resume_screener::input::pdf_service::PdfService;
use resume_screener::llm;
use resume_screener::llm::prompts::PromptStore;
use resume_screener::output::formatter::ConsoleFormatter;
use resume_screener::processing::analyzer::AnalysisService;
use resume_screener::session::controller::{InteractionController, Notice, UploadedFile};
use resume_screener::session::state::SessionState;
use resume_screener::Config;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // .env may carry RUST_LOG, so it is read before the logger is built.
    let dotenv = dotenvy::dotenv();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Failed to read .env file: {}", e);
        }
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let formatter = ConsoleFormatter::new(!cli.no_color);
    if let Err(e) = run_command(cli.command, config, cli.config, &formatter).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    config_path: Option<PathBuf>,
    formatter: &ConsoleFormatter,
) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
        } => {
            let job_description = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, &["txt", "md"])
                        .map_err(|e| anyhow!("Job description file: {}", e))?;
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read job description {}", path.display()))?
                }
                (None, Some(text)) => text,
                (None, None) => return Err(anyhow!("A job description is required")),
            };

            let bytes = tokio::fs::read(&resume)
                .await
                .with_context(|| format!("Failed to read resume {}", resume.display()))?;
            let file = UploadedFile::new(display_name(&resume), bytes);

            let controller = build_controller(&config).await?;
            let state = drive_cycle(
                &controller,
                formatter,
                SessionState::new(),
                Some(&file),
                job_description.trim(),
                true,
            )
            .await;
            controller.pdf_service().cleanup_temp_directory();

            if state.last_response.is_none() {
                return Err(anyhow!("Analysis did not complete"));
            }
        }

        Commands::Session => {
            let controller = build_controller(&config).await?;
            run_session(&controller, formatter).await?;
            controller.pdf_service().cleanup_temp_directory();
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Provider: {}", config.llm.provider);
                println!("Model: {}", display_or_unset(&config.llm.model));
                println!("Base URL: {}", config.base_url());
                println!("API Key: {}", config.masked_api_key());
                println!("Ollama Host: {}", config.llm.ollama_host);
                println!("Temperature: {}", config.llm.temperature);
                println!("Request Timeout: {}s", config.llm.timeout_secs);
                println!("Prompt File: {}", config.prompts.path.display());
                println!("Temporary Upload Directory: {}", config.storage.temp_dir.display());
            }

            Some(ConfigAction::Init { force }) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                if path.exists() && !force {
                    println!("⚠️  {} already exists. Use --force to overwrite.", path.display());
                    return Ok(());
                }
                let written = Config::default().save(Some(&path))?;
                println!("✅ Configuration written to {}", written.display());
            }
        },
    }

    Ok(())
}

/// Wire the controller from configuration; any missing piece aborts startup.
async fn build_controller(config: &Config) -> anyhow::Result<InteractionController> {
    let prompts = PromptStore::load(&config.prompts.path);
    let system_prompt = prompts
        .get(&config.prompts.system_prompt_key)
        .with_context(|| format!("Check the prompt file {}", config.prompts.path.display()))?
        .to_string();
    prompts
        .get(&config.prompts.user_prompt_key)
        .with_context(|| format!("Check the prompt file {}", config.prompts.path.display()))?;

    let client = llm::client::connect(config, Some(system_prompt.as_str()))
        .await
        .context("Failed to initialise the chat client")?;
    info!("Using {} model {}", config.llm.provider, client.model_name());

    let pdf = PdfService::new(&config.storage.temp_dir)?;
    let analysis = AnalysisService::new(client, prompts, config.prompts.user_prompt_key.clone());
    Ok(InteractionController::new(pdf, analysis))
}

async fn run_session(controller: &InteractionController, formatter: &ConsoleFormatter) -> anyhow::Result<()> {
    println!("🚀 Resume screening session (model: {})", controller.model_name());
    println!("{}\n", cli::SESSION_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = SessionState::new();
    let mut file: Option<UploadedFile> = None;
    let mut job_description = String::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match cli::parse_session_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", formatter.format_notice(&Notice::Warning(message)));
                continue;
            }
        };

        match command {
            SessionCommand::Upload(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    file = Some(UploadedFile::new(display_name(&path), bytes));
                    state = drive_cycle(controller, formatter, state, file.as_ref(), &job_description, false).await;
                }
                Err(e) => println!(
                    "{}",
                    formatter.format_notice(&Notice::Error(format!("Could not read {}: {}", path.display(), e)))
                ),
            },
            SessionCommand::Remove => {
                file = None;
                state = drive_cycle(controller, formatter, state, None, &job_description, false).await;
            }
            SessionCommand::Job(text) => {
                job_description = text;
                println!("{}", formatter.format_notice(&job_notice(&job_description)));
            }
            SessionCommand::JobFile(path) => match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    job_description = text.trim().to_string();
                    println!("{}", formatter.format_notice(&job_notice(&job_description)));
                }
                Err(e) => println!(
                    "{}",
                    formatter.format_notice(&Notice::Error(format!("Could not read {}: {}", path.display(), e)))
                ),
            },
            SessionCommand::Analyze => {
                state = drive_cycle(controller, formatter, state, file.as_ref(), &job_description, true).await;
            }
            SessionCommand::Status => {
                println!("Session: {}", state.phase());
                println!(
                    "Resume: {}",
                    state.uploaded_file_identity.as_deref().unwrap_or("(none)")
                );
                println!("Job description: {} characters", job_description.chars().count());
            }
            SessionCommand::Help => println!("{}", cli::SESSION_HELP),
            SessionCommand::Quit => break,
        }
    }

    info!("Session ended.");
    Ok(())
}

/// One input cycle with a spinner around each blocking step. Results are
/// shown only when the cycle changed something.
async fn drive_cycle(
    controller: &InteractionController,
    formatter: &ConsoleFormatter,
    state: SessionState,
    file: Option<&UploadedFile>,
    job_description: &str,
    analyze: bool,
) -> SessionState {
    let extraction = file
        .filter(|f| state.needs_extraction(f.identity()))
        .map(|f| format!("Extracting text from '{}'...", f.name));
    let transition = with_spinner(extraction, async { controller.on_file(state, file) }).await;
    let mut notices = transition.notices;
    let mut state = transition.state;

    if analyze {
        let analysis = (state.has_text() && !job_description.is_empty()).then(|| {
            format!(
                "Analyzing with {}... This may take a moment.",
                controller.model_name()
            )
        });
        let transition = with_spinner(analysis, controller.on_analyze(state, job_description)).await;
        notices.extend(transition.notices);
        state = transition.state;
    }

    if !notices.is_empty() {
        notices.extend(InteractionController::results(&state));
        println!("{}", formatter.format_notices(&notices));
    }
    state
}

async fn with_spinner<T>(message: Option<String>, work: impl Future<Output = T>) -> T {
    let Some(message) = message else {
        return work.await;
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    let result = work.await;
    spinner.finish_and_clear();
    result
}

fn job_notice(job_description: &str) -> Notice {
    if job_description.is_empty() {
        Notice::Warning("Job description is empty.".to_string())
    } else {
        Notice::Status(format!(
            "Job description set ({} characters).",
            job_description.chars().count()
        ))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
