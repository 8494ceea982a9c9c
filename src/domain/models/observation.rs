//! Measured outcomes.

use serde::{Deserialize, Serialize};

use super::parameter::Configuration;

/// A recorded (configuration, score) pair. Lower scores are better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub configuration: Configuration,
    pub score: f64,
    /// Confidence half-width around `score`, when it is a sample mean.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_width: Option<f64>,
}

impl Observation {
    /// Observation without a half-width.
    pub fn new(configuration: Configuration, score: f64) -> Self {
        Self {
            configuration,
            score,
            half_width: None,
        }
    }

    /// Attach a confidence half-width.
    pub fn with_half_width(mut self, half_width: Option<f64>) -> Self {
        self.half_width = half_width;
        self
    }
}

/// Aggregate of one adaptive sampling sequence over a single configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub mean: f64,
    /// `z * standard_error`; `None` with fewer than two scores.
    pub half_width: Option<f64>,
    /// Unbiased sample variance; `None` with fewer than two scores.
    pub variance: Option<f64>,
    pub scores: Vec<f64>,
    /// Channel invocations spent, failed ones included.
    pub invocations: u32,
    pub stopped_early: bool,
}

impl SampleSummary {
    /// The mean as an observation of `configuration`.
    pub fn to_observation(&self, configuration: Configuration) -> Observation {
        Observation::new(configuration, self.mean).with_half_width(self.half_width)
    }
}

/// Outcome of evaluating one configuration inside the optimization loop.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialResult {
    Success(SampleSummary),
    /// Sampling gave up; the reason is kept for the log.
    Failed(String),
}

impl TrialResult {
    /// The value handed to the minimizer; failures map to `penalty`.
    pub fn objective_value(&self, penalty: f64) -> f64 {
        match self {
            Self::Success(summary) => summary.mean,
            Self::Failed(_) => penalty,
        }
    }

    /// Whether sampling gave up.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
