//! Excursion — interactive registry of activity operators, activities, and
//! reviews.
//!
//! # Usage
//!
//! ```text
//! excursion [--config <file>] [--script <file>] [--no-color] [--echo]
//! ```
//!
//! Inside the session:
//!
//! ```text
//! create-operator "Adventure Tours" AKL
//! create-activity "Bungee Jump" Adventure AT-AKL-001
//! add-public-review AT-AKL-001-001 Ana n 5 "Wild ride"
//! display-top-activities
//! exit
//! ```
//!
//! Commands come from a terminal (line editor with history), a `--script`
//! file, or piped stdin. Nothing is saved between runs.

mod commands;
mod repl;
mod tokenize;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use commands::Session;
use excursion_core::{config, ConfigError, ExcursionConfig};
use excursion_renderer::Renderer;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "excursion",
    version,
    about = "Register activity operators, their activities, and reviews",
    long_about = None,
)]
struct Cli {
    /// Config file to use instead of ~/.excursion/config.yaml.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read commands from a file instead of stdin.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,

    /// Echo each non-interactive command after the prompt.
    #[arg(long)]
    echo: bool,
}

// ---------------------------------------------------------------------------
// Process setup
// ---------------------------------------------------------------------------

fn load_config(explicit: Option<&Path>) -> Result<ExcursionConfig> {
    match explicit {
        Some(path) => config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => match config::load() {
            Err(ConfigError::HomeNotFound) => Ok(ExcursionConfig::default()),
            other => other.context("failed to load ~/.excursion/config.yaml"),
        },
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn configure_color(no_color: bool, configured: Option<bool>) {
    let enabled = !no_color
        && configured.unwrap_or_else(|| {
            io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        });
    colored::control::set_override(enabled);
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log_level);
    configure_color(cli.no_color, config.color);

    let renderer = Renderer::with_overrides(config.template_dir.as_deref())
        .context("failed to load message templates")?;
    let mut session = Session::new(renderer);
    let echo = cli.echo || config.echo;
    tracing::debug!(script = ?cli.script, echo, "session started");

    let mut stdout = io::stdout().lock();
    let outcome = match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            repl::run_lines(&mut session, BufReader::new(file), &config.prompt, echo, &mut stdout)
        }
        None if io::stdin().is_terminal() => {
            drop(stdout);
            repl::run_interactive(&mut session, &config.prompt)
        }
        None => repl::run_lines(&mut session, io::stdin().lock(), &config.prompt, echo, &mut stdout),
    };
    tracing::debug!(operators = session.registry().operators().len(), "session ended");
    outcome
}
