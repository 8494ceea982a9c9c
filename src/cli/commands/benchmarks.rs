//! Implementation of the `jsc-tune benchmarks` command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::BenchmarkKind;

/// One row of the `benchmarks` listing.
#[derive(Debug, Serialize)]
pub struct BenchmarkEntry {
    pub name: &'static str,
    pub remote: bool,
    pub maximizes: bool,
    pub description: &'static str,
}

/// Output of `jsc-tune benchmarks`.
#[derive(Debug, Serialize)]
pub struct BenchmarksOutput {
    pub benchmarks: Vec<BenchmarkEntry>,
}

impl BenchmarksOutput {
    /// Describe every known benchmark kind.
    pub fn collect() -> Self {
        Self {
            benchmarks: BenchmarkKind::ALL
                .iter()
                .map(|kind| BenchmarkEntry {
                    name: kind.name(),
                    remote: kind.is_remote(),
                    maximizes: kind.maximizes(),
                    description: kind.description(),
                })
                .collect(),
        }
    }
}

impl CommandOutput for BenchmarksOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_benchmarks(&BenchmarkKind::ALL)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// List the benchmark kinds.
pub fn execute(json_mode: bool) -> Result<()> {
    output(&BenchmarksOutput::collect(), json_mode);
    Ok(())
}
