//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{analyze, cycles, session_cmd};
use crate::domain::Strategy;
use crate::engine::Prioritizer;
use crate::storage::{Config, FileSessionStore};

#[derive(Parser)]
#[command(name = "taskrank")]
#[command(author, version, about = "Prioritize tasks by urgency, importance, effort and dependencies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Session file holding the last analyzed task set
    #[arg(long, global = true, env = "TASKRANK_SESSION")]
    pub session: Option<PathBuf>,

    /// Read configuration from this file only
    #[arg(long, global = true, env = "TASKRANK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a task list and make it the current session
    Analyze {
        /// JSON or YAML task file (stdin if omitted or '-')
        file: Option<PathBuf>,

        /// Scoring strategy
        #[arg(long, short)]
        strategy: Option<Strategy>,

        /// Date to treat as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show the top-ranked tasks of the current session
    Suggest {
        /// Scoring strategy (may differ from the one used to analyze)
        #[arg(long, short)]
        strategy: Option<Strategy>,

        /// Maximum number of suggestions
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Date to treat as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Report dependency cycles and external dependencies in a task file
    Cycles {
        /// JSON or YAML task file (stdin if omitted or '-')
        file: Option<PathBuf>,
    },

    /// List the available strategies
    Strategies,

    /// Inspect or clear the current session
    #[command(subcommand)]
    Session(session_cmd::SessionCommands),
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "taskrank=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    let output = Output::new(cli.format.unwrap_or_else(|| config.default_format.into()));

    let session_path = cli.session.clone().unwrap_or_else(|| config.session_path.clone());
    output.verbose_ctx("session", &format!("Using session file: {}", session_path.display()));
    let store = FileSessionStore::new(session_path);

    match cli.command {
        Commands::Analyze { file, strategy, today } => {
            let strategy = strategy.unwrap_or(config.default_strategy);
            let engine = Prioritizer::new(store);
            analyze::analyze(&output, &engine, file.as_deref(), strategy, resolve_today(today))?
        }

        Commands::Suggest { strategy, limit, today } => {
            let strategy = strategy.unwrap_or(config.default_strategy);
            let limit = limit.unwrap_or(config.suggest_limit);
            if limit == 0 {
                anyhow::bail!("--limit must be at least 1");
            }
            let engine = Prioritizer::new(store).with_suggest_limit(limit);
            analyze::suggest(&output, &engine, strategy, resolve_today(today))?
        }

        Commands::Cycles { file } => cycles::run(&output, file.as_deref())?,

        Commands::Strategies => strategies(&output, config.default_strategy),

        Commands::Session(cmd) => session_cmd::run(cmd, &output, &store)?,
    }

    output.verbose_ctx("done", "Command completed successfully");
    Ok(())
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn strategies(output: &Output, default: Strategy) {
    if output.is_json() {
        let items: Vec<_> = Strategy::ALL
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.as_str(),
                    "description": s.label(),
                    "default": *s == default,
                })
            })
            .collect();
        output.data(&items);
        return;
    }

    for strategy in Strategy::ALL {
        let marker = if strategy == default { "*" } else { " " };
        println!("{} {:<16} {}", marker, strategy.as_str(), strategy.label());
    }
}
