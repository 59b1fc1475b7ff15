//! CLI command definitions and handlers

mod classify;
mod progress;
mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate a recognizer threshold (0.0-1.0)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err("threshold must be between 0 and 1".to_string())
    }
}

/// codeweave - source metrics and dependency model for a codebase
#[derive(Parser, Debug)]
#[command(name = "codeweave")]
#[command(
    version,
    about = "Scan a source tree into an entity model, aggregate line and complexity metrics, and spot commented-out code",
    after_help = "\
Examples:
  codeweave scan .                        Scan the current directory
  codeweave scan src --format json        JSON output for scripting
  codeweave classify src/main.c           Score each line as code or prose
  echo 'int x = 1;' | codeweave classify  Classify stdin (C-family by default)"
)]
pub struct Cli {
    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory and report aggregated metrics
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Stop at the first file that fails to parse
        #[arg(long)]
        fail_fast: bool,

        /// Commented-out code threshold (overrides codeweave.toml)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Log progress instead of drawing a progress bar
        #[arg(long)]
        no_progress: bool,

        /// Number of most complex files to list in text output
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Print each line's probability of being code
    Classify {
        /// File to classify (default: stdin)
        file: Option<PathBuf>,

        /// Language by file extension when reading stdin (e.g. c, py, rs)
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Decision threshold
        #[arg(long, default_value = "0.9", value_parser = parse_threshold)]
        threshold: f64,

        /// Only print lines judged to be code
        #[arg(long)]
        code_only: bool,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            path,
            format,
            fail_fast,
            threshold,
            no_progress,
            top,
        } => scan::run(
            &path,
            scan::ScanOptions {
                format,
                fail_fast,
                threshold,
                no_progress,
                top,
            },
        ),

        Commands::Classify {
            file,
            language,
            threshold,
            code_only,
        } => classify::run(file.as_deref(), language.as_deref(), threshold, code_only),
    }
}
