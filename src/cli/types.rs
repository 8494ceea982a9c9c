//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::history::HistoryArgs;
use crate::cli::commands::run::RunArgs;

/// jsc-tune command line.
#[derive(Parser, Debug)]
#[command(name = "jsc-tune")]
#[command(about = "Tune JavaScriptCore parameters against a noisy remote benchmark", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./jsc-tune.yaml)
    #[arg(short, long, global = true, env = "JSC_TUNE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Options shared by every subcommand.
    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            json: self.json,
            config: self.config.clone(),
            verbose: self.verbose,
        }
    }
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub json: bool,
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a tuning session
    Run(RunArgs),

    /// Show the seed points earlier sessions contribute under the current bounds
    History(HistoryArgs),

    /// List available benchmarks
    Benchmarks,
}
