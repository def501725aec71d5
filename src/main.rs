//! minesafe - hazard analytics and compliance audits for mining-accident data.
//!
//! # Commands
//!
//! - `minesafe analyze [--deep]` - recurring hazard patterns and risk clusters
//! - `minesafe audit --year 2015 [--state Jharkhand]` - compliance audit report
//! - `minesafe stats [--year 2015] [--state Odisha]` - dashboard statistics
//! - `minesafe verify` - per-bucket dataset verification
//! - `minesafe search "roof fall"` - query the snippet search service
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use minesafe_service::analysis::stats::{ALL, StatsFilter, accident_stats};
use minesafe_service::analysis::{AnalysisDepth, analyze};
use minesafe_service::audit::report::{ALL_STATES, generate_audit_report};
use minesafe_service::config::{EngineConfig, load_config};
use minesafe_service::ingest::accidents::{load_collection, normalize_collection};
use minesafe_service::logging::{self, Component};
use minesafe_service::model::{AccidentRecord, EngineError};
use minesafe_service::search::{DEFAULT_TIMEOUT_SECS, HttpSnippetSearch, SnippetSearch};
use minesafe_service::verify::{print_summary, verify_collection};

/// Hazard analytics and audit engine for mining-accident records
#[derive(Parser)]
#[command(name = "minesafe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./minesafe.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Accident collection JSON, overriding the configured path
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find recurring hazard patterns and geographic risk clusters
    Analyze {
        /// Deep analysis: richer narratives and urgent recommendations
        #[arg(long)]
        deep: bool,
    },

    /// Generate a compliance audit report
    Audit {
        /// Audit year, matched against bucket labels
        #[arg(short, long)]
        year: String,

        /// State to audit
        #[arg(short, long, default_value = ALL_STATES)]
        state: String,
    },

    /// Summary statistics for the dashboard
    Stats {
        #[arg(short, long, default_value = ALL)]
        year: String,

        #[arg(short, long, default_value = ALL)]
        state: String,
    },

    /// Check every bucket of the collection
    Verify {
        /// Print the report as JSON instead of a summary table
        #[arg(long)]
        json: bool,
    },

    /// Retrieve accident-report snippets from the search service
    Search {
        query: String,

        /// Maximum snippets returned (default from config)
        #[arg(short, long)]
        k: Option<usize>,

        /// Minimum similarity score (default from config)
        #[arg(long)]
        min_score: Option<f64>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), EngineError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(config: &EngineConfig) -> Result<Vec<AccidentRecord>, EngineError> {
    normalize_collection(&load_collection(&config.data.path)?)
}

fn run(cli: Cli) -> Result<(), EngineError> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }

    logging::init_logger(
        config.logging.log_level()?,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    logging::debug(Component::System, None, &format!("data source {}", config.data.path));

    match cli.command {
        Commands::Analyze { deep } => {
            let depth = if deep { AnalysisDepth::Deep } else { AnalysisDepth::Standard };
            print_json(&analyze(&load(&config)?, depth))
        }
        Commands::Audit { year, state } => {
            print_json(&generate_audit_report(&load(&config)?, &year, &state))
        }
        Commands::Stats { year, state } => {
            print_json(&accident_stats(&load(&config)?, &StatsFilter::new(&year, &state)))
        }
        Commands::Verify { json } => {
            let report = verify_collection(&load_collection(&config.data.path)?)?;
            if json {
                print_json(&report)
            } else {
                print_summary(&report);
                Ok(())
            }
        }
        Commands::Search { query, k, min_score } => {
            let settings = config.search.ok_or_else(|| {
                EngineError::Config("no search endpoint configured".to_string())
            })?;
            let client = HttpSnippetSearch::new(
                &settings.endpoint,
                Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            )?;
            logging::info(
                Component::Search,
                Some(client.endpoint()),
                &format!("querying '{}'", query),
            );
            let hits = client.search(
                &query,
                k.unwrap_or(settings.k),
                min_score.unwrap_or(settings.min_score),
            )?;
            print_json(&hits)
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
