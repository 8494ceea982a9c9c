//! Adaptive sampling of one configuration.
//!
//! Re-runs a noisy benchmark for the same configuration until the mean is
//! precise enough or the sample budget is spent. One failed invocation per
//! sequence is tolerated and consumes budget; a second one aborts the
//! sequence.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::errors::{SamplingError, SamplingResult};
use crate::domain::models::SampleSummary;
use crate::domain::ports::MeasurementChannel;
use crate::services::statistics::{self, DEFAULT_CONFIDENCE_COEFFICIENT};

/// Failed invocations tolerated per sampling sequence.
const TOLERATED_FAILURES: u32 = 1;

/// Samples one configuration until its mean is precise enough.
#[derive(Clone)]
pub struct AdaptiveSampler {
    channel: Arc<dyn MeasurementChannel>,
    confidence_coefficient: f64,
}

impl AdaptiveSampler {
    /// Uses the ~95% coefficient.
    pub fn new(channel: Arc<dyn MeasurementChannel>) -> Self {
        Self {
            channel,
            confidence_coefficient: DEFAULT_CONFIDENCE_COEFFICIENT,
        }
    }

    /// Override the two-sided confidence coefficient `z`.
    pub fn with_confidence_coefficient(mut self, z: f64) -> Self {
        self.confidence_coefficient = z;
        self
    }

    /// The two-sided coefficient `z` in use.
    pub fn confidence_coefficient(&self) -> f64 {
        self.confidence_coefficient
    }

    /// Name of the benchmark being sampled.
    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }

    /// Sample `configuration` at most `max_samples` times.
    ///
    /// Stops early once at least three scores agree to within
    /// `target_relative_confidence`. If the single tolerated failure leaves
    /// the budget exhausted without any score, one extra invocation is made
    /// so that a result never holds fewer than one score.
    #[instrument(skip(self), fields(benchmark = self.channel.name()))]
    pub async fn sample(
        &self,
        configuration: &[i64],
        max_samples: u32,
        target_relative_confidence: f64,
    ) -> SamplingResult<SampleSummary> {
        if max_samples == 0 {
            return Err(SamplingError::ZeroBudget);
        }

        let z = self.confidence_coefficient;
        let mut scores: Vec<f64> = Vec::new();
        let mut invocations: u32 = 0;
        let mut failures: u32 = 0;
        let mut stopped_early = false;

        while invocations < max_samples || (scores.is_empty() && invocations == max_samples) {
            invocations += 1;
            match self.channel.measure(configuration).await {
                Ok(score) => {
                    scores.push(score);
                    debug!(invocation = invocations, score, "sample collected");
                    if statistics::confidence_reached(&scores, z, target_relative_confidence) {
                        stopped_early = invocations < max_samples;
                        break;
                    }
                }
                Err(source) => {
                    failures += 1;
                    if failures > TOLERATED_FAILURES {
                        return Err(SamplingError::SamplingFailure {
                            failures,
                            invocations,
                            source,
                        });
                    }
                    warn!(
                        invocation = invocations,
                        error = %source,
                        "benchmark invocation failed, retrying once"
                    );
                }
            }
        }

        let mean = statistics::mean(&scores).ok_or(SamplingError::NoSamples)?;
        let summary = SampleSummary {
            mean,
            half_width: statistics::half_width(&scores, z),
            variance: statistics::sample_variance(&scores),
            scores,
            invocations,
            stopped_early,
        };

        debug!(
            mean = summary.mean,
            samples = summary.scores.len(),
            invocations = summary.invocations,
            stopped_early = summary.stopped_early,
            "sampling finished"
        );
        Ok(summary)
    }
}
