//! Measurement channel port - one benchmark trial per call.

use async_trait::async_trait;

use crate::domain::errors::ExecutionError;

/// Runs one trial of a benchmark for a configuration.
///
/// Returns a minimized score (lower is better). Implementations keep no
/// mutable state between calls that influences the result.
#[async_trait]
pub trait MeasurementChannel: Send + Sync {
    /// Benchmark name used in logs.
    fn name(&self) -> &str;

    async fn measure(&self, configuration: &[i64]) -> Result<f64, ExecutionError>;
}
