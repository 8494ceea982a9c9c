//! Measurement channels, one per benchmark kind.

pub mod mock;
pub mod remote;

use std::sync::Arc;

use crate::domain::models::{BenchmarkConfig, BenchmarkKind, BenchmarkPaths, ParameterSpace};
use crate::domain::ports::{MeasurementChannel, RemoteExecutor};
use crate::infrastructure::retry::RetryPolicy;

pub use mock::MockBenchmarkChannel;
pub use remote::{encode_environment, RemoteBenchmarkChannel};

/// Builds the measurement channel for a benchmark kind.
pub struct ChannelRegistry {
    executor: Option<Arc<dyn RemoteExecutor>>,
    retry: RetryPolicy,
    seed: Option<u64>,
}

impl ChannelRegistry {
    /// `executor` is required only for remote benchmark kinds.
    pub fn new(executor: Option<Arc<dyn RemoteExecutor>>) -> Self {
        Self {
            executor,
            retry: RetryPolicy::default(),
            seed: None,
        }
    }

    /// Retry policy handed to every remote channel.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Seed for benchmarks that draw their own noise.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Create the channel for `config.kind`.
    ///
    /// Returns `None` when a remote benchmark is requested without an executor.
    pub fn create(
        &self,
        config: &BenchmarkConfig,
        space: &ParameterSpace,
    ) -> Option<Arc<dyn MeasurementChannel>> {
        match config.kind {
            BenchmarkKind::JetStream2 => {
                let executor = self.executor.clone()?;
                let paths = BenchmarkPaths {
                    engine: config.engine_path.clone(),
                    benchmark_dir: config.remote_path.clone(),
                };
                Some(Arc::new(
                    RemoteBenchmarkChannel::new(
                        config.kind,
                        executor,
                        paths,
                        space,
                        config.env_prefix.clone(),
                    )
                    .with_retry_policy(self.retry.clone()),
                ))
            }
            BenchmarkKind::Mock => Some(Arc::new(MockBenchmarkChannel::new(
                space.defaults(),
                self.seed,
            ))),
        }
    }
}
