//! Synthetic in-process benchmark for dry runs.
//!
//! The score grows with the distance from the default configuration and
//! carries enough noise to exercise adaptive sampling.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::errors::ExecutionError;
use crate::domain::models::{BenchmarkKind, Configuration};
use crate::domain::ports::MeasurementChannel;
use crate::services::statistics;

/// Multiplicative noise applied to each coordinate distance.
const RELATIVE_NOISE: f64 = 0.03;
/// Additive noise used when a coordinate sits exactly on its default.
const ZERO_DISTANCE_NOISE: f64 = 0.3;
/// Additive noise applied to the final score.
const SCORE_NOISE: f64 = 3.0;

/// Synthetic benchmark scored locally from the distance to the defaults.
pub struct MockBenchmarkChannel {
    defaults: Configuration,
    rng: Mutex<StdRng>,
}

impl MockBenchmarkChannel {
    /// `seed` makes the noise reproducible.
    pub fn new(defaults: Configuration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            defaults,
            rng: Mutex::new(rng),
        }
    }

    fn score(&self, configuration: &[i64], rng: &mut StdRng) -> f64 {
        let distances: Vec<f64> = self
            .defaults
            .iter()
            .zip(configuration)
            .map(|(default, value)| {
                let distance = (default - value) as f64;
                let noisy = if distance == 0.0 {
                    rng.gen_range(-ZERO_DISTANCE_NOISE..ZERO_DISTANCE_NOISE)
                } else {
                    let margin = distance.abs() * RELATIVE_NOISE;
                    distance + rng.gen_range(-margin..margin)
                };
                noisy.abs().max(f64::MIN_POSITIVE)
            })
            .collect();

        let gmean = statistics::geometric_mean(&distances).unwrap_or(0.0);
        gmean + rng.gen_range(-SCORE_NOISE..SCORE_NOISE)
    }
}

#[async_trait]
impl MeasurementChannel for MockBenchmarkChannel {
    fn name(&self) -> &str {
        BenchmarkKind::Mock.name()
    }

    async fn measure(&self, configuration: &[i64]) -> Result<f64, ExecutionError> {
        if configuration.len() != self.defaults.len() {
            return Err(ExecutionError::DimensionMismatch {
                expected: self.defaults.len(),
                actual: configuration.len(),
            });
        }

        let mut rng = self.rng.lock().map_err(|_| ExecutionError::Transport {
            command: BenchmarkKind::Mock.name().to_string(),
            message: "random source poisoned".to_string(),
        })?;
        Ok(self.score(configuration, &mut rng))
    }
}
