//! # council-cli
//!
//! Binary entry point for the Council interview simulator.
//!
//! Collects candidate details, runs the interactive interview loop against
//! the orchestrator, and writes the session log after every turn.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use council_adapters::{OpenAiProvider, SemanticRouter};
use council_core::{
    CandidateMetadata, CouncilConfig, SessionLogger, SessionOrchestrator,
};
use council_proto::{Grade, JudgmentProvider};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Council - simulated technical interview with a multi-agent panel
#[derive(Parser, Debug)]
#[command(name = "council", version, about)]
struct Cli {
    /// Candidate name (prompted when omitted)
    #[arg(long)]
    name: Option<String>,

    /// Target role, e.g. "Backend Developer" (prompted when omitted)
    #[arg(long)]
    role: Option<String>,

    /// Target grade: junior, middle, or senior
    #[arg(long, default_value = "middle")]
    grade: String,

    /// Short summary of experience (prompted when omitted)
    #[arg(long)]
    experience: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "council.yml")]
    config: PathBuf,

    /// Override the turn limit from the config
    #[arg(long)]
    max_turns: Option<u32>,

    /// Directory for session logs
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Classify intents by embedding similarity instead of a model call
    #[arg(long)]
    semantic_router: bool,

    /// Show the per-turn agent analysis trail
    #[arg(long)]
    debug: bool,

    /// Verbose tracing output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prompts on stdout and reads one line from stdin, re-prompting on empty
/// input.
fn prompt(label: &str) -> Result<String> {
    let stdin = std::io::stdin();
    loop {
        print!("{} ", label.cyan().bold());
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("stdin closed before setup finished");
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
}

/// Reads one candidate message. Returns `None` on EOF.
fn read_message() -> Result<Option<String>> {
    let stdin = std::io::stdin();
    loop {
        print!("{} ", "You:".green().bold());
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_interviewer(message: &str) {
    println!("\n{} {message}\n", "Interviewer:".yellow().bold());
}

fn print_thoughts(session: &SessionOrchestrator) {
    if let Some(record) = session.last_turn_record() {
        for line in record.internal_thoughts.lines() {
            println!("{}", format!("  {line}").dimmed());
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = CouncilConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    if let Some(max_turns) = cli.max_turns {
        config.session.max_turns = max_turns;
    }
    if cli.semantic_router {
        config.provider.semantic_router = true;
    }

    let Some(target_grade) = Grade::parse(&cli.grade) else {
        bail!("unknown grade '{}': expected junior, middle, or senior", cli.grade);
    };

    println!("{}", "Council - simulated technical interview".bold());
    println!("{}", "Answer honestly; the panel is watching.\n".dimmed());

    let metadata = CandidateMetadata {
        name: match cli.name {
            Some(name) => name,
            None => prompt("Your name:")?,
        },
        role: match cli.role {
            Some(role) => role,
            None => prompt("Target role:")?,
        },
        target_grade,
        experience: match cli.experience {
            Some(experience) => experience,
            None => prompt("Briefly, your experience:")?,
        },
    };

    let backend = OpenAiProvider::from_env(&config.provider)
        .context("failed to initialize the judgment provider")?;
    let provider: Arc<dyn JudgmentProvider> = if config.provider.semantic_router {
        info!("Semantic intent routing enabled");
        Arc::new(SemanticRouter::from_env(backend, &config.provider)?)
    } else {
        Arc::new(backend)
    };

    let mut logger = SessionLogger::start(&cli.log_dir, &metadata.name)
        .context("failed to create the session log")?;

    let bar = spinner("Preparing the interview plan...");
    let mut session = SessionOrchestrator::start(&config, provider, metadata).await;
    bar.finish_and_clear();
    print_interviewer(session.last_response());

    while session.is_active() {
        let Some(message) = read_message()? else {
            println!("\n{}", "Input closed; ending the session.".dimmed());
            break;
        };

        let bar = spinner("The panel is deliberating...");
        let response = session.process_message(&message).await;
        bar.finish_and_clear();

        if let Some(record) = session.last_turn_record() {
            logger.log_turn(record.clone());
        }
        if cli.debug {
            print_thoughts(&session);
        }

        if session.is_active() {
            print_interviewer(&response);
        } else {
            logger.log_final_report(&response);
            println!("\n{response}");
        }
    }

    println!(
        "\n{} {}",
        "Session log saved to".dimmed(),
        logger.path().display()
    );
    Ok(())
}
