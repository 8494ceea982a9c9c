//! Measurement channel that runs the benchmark on the remote host.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::domain::errors::ExecutionError;
use crate::domain::models::{BenchmarkKind, BenchmarkPaths, ParameterSpace};
use crate::domain::ports::{MeasurementChannel, RemoteExecutor};
use crate::infrastructure::retry::RetryPolicy;

/// Encode a configuration as `PREFIX<name>=<value>` assignments, space
/// separated, in parameter order.
pub fn encode_environment<'a>(
    prefix: &str,
    names: impl IntoIterator<Item = &'a str>,
    configuration: &[i64],
) -> String {
    names
        .into_iter()
        .zip(configuration)
        .map(|(name, value)| format!("{prefix}{name}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs one benchmark kind on the remote host through a [`RemoteExecutor`].
pub struct RemoteBenchmarkChannel {
    kind: BenchmarkKind,
    executor: Arc<dyn RemoteExecutor>,
    paths: BenchmarkPaths,
    names: Vec<String>,
    env_prefix: String,
    retry: RetryPolicy,
}

impl RemoteBenchmarkChannel {
    /// `prefix` is prepended to every parameter name in the environment.
    pub fn new(
        kind: BenchmarkKind,
        executor: Arc<dyn RemoteExecutor>,
        paths: BenchmarkPaths,
        space: &ParameterSpace,
        env_prefix: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            executor,
            paths,
            names: space.names().map(str::to_string).collect(),
            env_prefix: env_prefix.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the default three-attempt policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full shell command for one trial of `configuration`.
    pub fn command_for(&self, configuration: &[i64]) -> Result<String, ExecutionError> {
        if configuration.len() != self.names.len() {
            return Err(ExecutionError::DimensionMismatch {
                expected: self.names.len(),
                actual: configuration.len(),
            });
        }

        let env = encode_environment(
            &self.env_prefix,
            self.names.iter().map(String::as_str),
            configuration,
        );
        self.kind
            .command(&env, &self.paths)
            .ok_or_else(|| ExecutionError::Transport {
                command: self.kind.name().to_string(),
                message: "benchmark has no remote command".to_string(),
            })
    }
}

#[async_trait]
impl MeasurementChannel for RemoteBenchmarkChannel {
    fn name(&self) -> &str {
        self.kind.name()
    }

    #[instrument(skip(self), fields(host = self.executor.host(), benchmark = self.kind.name()))]
    async fn measure(&self, configuration: &[i64]) -> Result<f64, ExecutionError> {
        let command = self.command_for(configuration)?;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(attempt, command = %command, "running benchmark");

            let failure = match self.executor.execute(&command).await {
                Ok(output) if output.success() => {
                    // Parse failures are not retried: the process did run.
                    return self.kind.extract_score(&output.stdout, &output.stderr);
                }
                Ok(output) => ExecutionError::TransientExecutionFailure {
                    command: command.clone(),
                    attempts: attempt,
                    status: output.status_display(),
                    stdout: output.stdout,
                    stderr: output.stderr,
                },
                Err(err) if err.is_transient() => ExecutionError::TransientExecutionFailure {
                    command: command.clone(),
                    attempts: attempt,
                    status: "transport error".to_string(),
                    stdout: String::new(),
                    stderr: err.to_string(),
                },
                Err(err) => return Err(err),
            };

            if !self.retry.allows_retry_after(attempt) {
                return Err(failure);
            }

            let backoff = self.retry.calculate_backoff(attempt);
            warn!(
                attempt,
                max_attempts = self.retry.max_attempts(),
                "benchmark run failed, retrying in {:?}",
                backoff
            );
            sleep(backoff).await;
        }
    }
}
