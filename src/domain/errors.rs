//! Domain errors for the tuning controller.

use thiserror::Error;

/// Failures of a single benchmark measurement.
///
/// `TransientExecutionFailure` is what remains after the invocation-level
/// retry budget has been spent; `MalformedOutput` is raised on the first
/// attempt that exits normally but does not carry a parseable payload.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    #[error(
        "Command \"{command}\" failed {attempts} times.\nreturn value: {status}\nstderr:\n{stderr}\nstdout:\n{stdout}"
    )]
    TransientExecutionFailure {
        command: String,
        attempts: u32,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Could not parse {benchmark} output: {reason}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    MalformedOutput {
        benchmark: String,
        reason: String,
        stdout: String,
        stderr: String,
    },

    #[error("Transport error while running \"{command}\": {message}")]
    Transport { command: String, message: String },

    #[error("Configuration has {actual} coordinates, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl ExecutionError {
    /// Whether another invocation of the same command may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::TransientExecutionFailure { .. })
    }
}

/// Failures of one adaptive sampling sequence.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("Sampling aborted after {failures} failures in {invocations} invocations: {source}")]
    SamplingFailure {
        failures: u32,
        invocations: u32,
        #[source]
        source: ExecutionError,
    },

    #[error("Sample budget must be at least 1")]
    ZeroBudget,

    #[error("Sampling finished without a single score")]
    NoSamples,
}

/// Fatal errors raised before the optimizer is ever called.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Session setup failed while running \"{command}\": {message}")]
    SessionSetupFailure { command: String, message: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("No tunable parameters configured")]
    NoParameters,

    #[error("Could not prepare output directory {path}: {message}")]
    OutputDirectory { path: String, message: String },
}

/// Errors reported by a minimizer implementation.
#[derive(Debug, Error)]
pub enum MinimizerError {
    #[error("Seed data mismatch: {x0} configurations but {y0} scores")]
    SeedLengthMismatch { x0: usize, y0: usize },

    #[error("Seed configuration {index} has {actual} coordinates, expected {expected}")]
    SeedDimension {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Search space has no dimensions")]
    EmptySpace,

    #[error("Minimization produced no evaluations")]
    NoEvaluations,
}

/// Result of a sampling sequence.
pub type SamplingResult<T> = Result<T, SamplingError>;
