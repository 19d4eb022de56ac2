//! Command-line parsing for the toxicity dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring and transport code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::API_URL_ENV;
use crate::scoring::DEFAULT_TOP_K;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "toxiscan",
    version,
    about = "Multi-label toxicity dashboard (6 labels) for a remote classification API"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Base URL of the classification API.
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// How many labels to highlight in the single-text view.
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_K)]
    pub top: usize,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether the API is up and its model is loaded.
    Health,
    /// Classify a single text and print the analysis.
    Predict(PredictArgs),
    /// Upload a CSV (column `text` or `comment_text`) and print the batch results.
    Batch(BatchArgs),
    /// Launch the interactive dashboard.
    Tui(TuiArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Text to analyse.
    pub text: String,

    /// Print the rendered analysis as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// CSV file to upload.
    #[arg(value_name = "CSV")]
    pub file: PathBuf,

    /// Write every row (probabilities, predictions, score, tier) to this CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print the rendered batch view as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Write logs to this file while the dashboard is open.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Rewrite argv so `toxiscan` defaults to `toxiscan tui`.
///
/// Rules:
/// - `toxiscan`                    -> `toxiscan tui`
/// - `toxiscan --api-url URL ...`  -> `toxiscan tui --api-url URL ...`
/// - `toxiscan --help/--version`   -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let has_subcommand = argv[1..]
        .iter()
        .any(|a| matches!(a.as_str(), "health" | "predict" | "batch" | "tui"));
    if has_subcommand {
        return argv;
    }

    // Only flags given: treat them as dashboard flags.
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
