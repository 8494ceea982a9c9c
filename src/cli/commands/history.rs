//! Implementation of the `jsc-tune history` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::table::SeedRow;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::GlobalOptions;
use crate::domain::models::{ParameterSpace, SessionHistory};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::infrastructure::storage;
use crate::services::filter_in_bounds;

/// Arguments for `jsc-tune history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Dump files written by earlier sessions
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Seeds that a session would take from the given dumps.
#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub parameters: Vec<String>,
    pub total: usize,
    pub kept: usize,
    pub seeds: Vec<SeedRow>,
}

impl HistoryOutput {
    /// Seed rows the given histories contribute under `space`'s bounds.
    pub fn build(space: &ParameterSpace, histories: &[SessionHistory]) -> Self {
        let bounds = space.bounds();
        let mut seeds = Vec::new();
        let mut total = 0;

        for history in histories {
            total += history.len();
            let source = history
                .source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            seeds.extend(
                filter_in_bounds(&history.observations, &bounds)
                    .into_iter()
                    .map(|obs| SeedRow {
                        source: source.clone(),
                        configuration: obs.configuration,
                        score: obs.score,
                    }),
            );
        }

        Self {
            parameters: space.names().map(str::to_string).collect(),
            total,
            kept: seeds.len(),
            seeds,
        }
    }
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Using {} of {} previous points",
            self.kept, self.total
        )];
        if !self.seeds.is_empty() {
            lines.push(TableFormatter::new().format_seeds(&self.parameters, &self.seeds));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Load dumps, merge them under the configured bounds and print the seeds.
pub fn execute(args: HistoryArgs, globals: &GlobalOptions) -> Result<()> {
    let config = ConfigLoader::load(globals.config.as_deref())?;
    let log_config = LogConfig::from_settings(&config.logging, globals.verbose)
        .map_err(anyhow::Error::msg)?;
    let _logger = LoggerImpl::init(&log_config)?;

    let space = ParameterSpace::new(config.parameters.clone())
        .context("Invalid parameter configuration")?;
    let histories = storage::load_histories(&args.files)?;

    output(&HistoryOutput::build(&space, &histories), globals.json);
    Ok(())
}
