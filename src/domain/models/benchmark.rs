//! Benchmark kinds and score extraction.
//!
//! Every kind is an explicit variant: selecting one is a lookup by name,
//! never a side effect of module loading.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ExecutionError;

/// Where the benchmark and the engine live on the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkPaths {
    /// Engine executable, e.g. `jsc` or `/opt/webkit/bin/jsc`.
    pub engine: String,
    /// Directory holding the benchmark sources.
    pub benchmark_dir: String,
}

/// Benchmarks the tuner knows how to run and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BenchmarkKind {
    #[default]
    JetStream2,
    /// Synthetic, in-process benchmark for dry runs.
    #[serde(rename = "MockBenchmark")]
    Mock,
}

impl BenchmarkKind {
    /// Every kind, in listing order.
    pub const ALL: [BenchmarkKind; 2] = [BenchmarkKind::JetStream2, BenchmarkKind::Mock];

    /// Name used on the command line and in config.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JetStream2 => "JetStream2",
            Self::Mock => "MockBenchmark",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::JetStream2 => "JetStream 2 CLI runner (watch-cli.js) on the remote host",
            Self::Mock => "Local synthetic score, distance from defaults plus noise",
        }
    }

    /// Whether measurements go through the remote executor.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::JetStream2)
    }

    /// Whether higher raw scores are better. Such scores are negated before
    /// they reach the minimizer.
    pub fn maximizes(&self) -> bool {
        matches!(self, Self::JetStream2)
    }

    /// Shell command that runs one trial with `env_assignments` prepended.
    ///
    /// `None` for kinds that are measured in-process.
    pub fn command(&self, env_assignments: &str, paths: &BenchmarkPaths) -> Option<String> {
        match self {
            Self::JetStream2 => Some(format!(
                "cd {}; {} {} watch-cli.js",
                paths.benchmark_dir, env_assignments, paths.engine
            )),
            Self::Mock => None,
        }
    }

    /// Turn the captured output of one successful run into a minimized score.
    pub fn extract_score(&self, stdout: &str, stderr: &str) -> Result<f64, ExecutionError> {
        match self {
            Self::JetStream2 => {
                suite_geometric_mean(stdout, "JetStream2.0")
                    .map(|score| -score)
                    .map_err(|reason| self.malformed(reason, stdout, stderr))
            }
            Self::Mock => Err(self.malformed(
                "this benchmark is measured in-process and produces no output".to_string(),
                stdout,
                stderr,
            )),
        }
    }

    fn malformed(&self, reason: String, stdout: &str, stderr: &str) -> ExecutionError {
        ExecutionError::MalformedOutput {
            benchmark: self.name().to_string(),
            reason,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BenchmarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown benchmark '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// `{"<suite>": {"tests": {<name>: {"metrics": {"Score": {"current": [..]}}}}}}`
#[derive(Debug, Deserialize)]
struct SuiteReport {
    tests: BTreeMap<String, TestReport>,
}

#[derive(Debug, Deserialize)]
struct TestReport {
    metrics: TestMetrics,
}

#[derive(Debug, Deserialize)]
struct TestMetrics {
    #[serde(rename = "Score")]
    score: ScoreMetric,
}

#[derive(Debug, Deserialize)]
struct ScoreMetric {
    current: Vec<f64>,
}

/// Geometric mean, across all tests of `suite`, of each test's first
/// current score, read from the first stdout line that starts with `{`.
pub fn suite_geometric_mean(stdout: &str, suite: &str) -> Result<f64, String> {
    let line = stdout
        .lines()
        .find(|line| line.starts_with('{'))
        .ok_or_else(|| "no JSON line in output".to_string())?;

    let mut report: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(line).map_err(|e| format!("invalid JSON payload: {e}"))?;
    let suite_value = report
        .remove(suite)
        .ok_or_else(|| format!("suite '{suite}' missing from payload"))?;
    let suite_report: SuiteReport = serde_json::from_value(suite_value)
        .map_err(|e| format!("unexpected '{suite}' payload shape: {e}"))?;

    let scores = suite_report
        .tests
        .iter()
        .map(|(name, test)| {
            test.metrics
                .score
                .current
                .first()
                .copied()
                .ok_or_else(|| format!("test '{name}' has no current score"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    crate::services::statistics::geometric_mean(&scores)
        .filter(|score| score.is_finite())
        .ok_or_else(|| "scores are empty or not strictly positive".to_string())
}
