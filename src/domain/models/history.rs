//! Historical observations and the seed data derived from them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::observation::Observation;
use super::parameter::{Bounds, Configuration};

/// Observations persisted by an earlier session, with the bounds they were
/// collected under (which need not match the current session's).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionHistory {
    pub bounds: Vec<Bounds>,
    pub observations: Vec<Observation>,
    /// File the history was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl SessionHistory {
    /// History collected under `bounds`.
    pub fn new(bounds: Vec<Bounds>, observations: Vec<Observation>) -> Self {
        Self {
            bounds,
            observations,
            source: None,
        }
    }

    /// Remember which file this history came from.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Parallel sequences of configurations and scores handed to a minimizer
/// as already-evaluated points.
///
/// A single baseline point is stored the same way as a merged history, so
/// consumers never distinguish "one value" from "many".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeedData {
    pub configurations: Vec<Configuration>,
    pub scores: Vec<f64>,
}

impl SeedData {
    /// No seed points.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seed data holding one point, shaped like a merged history.
    pub fn single(configuration: Configuration, score: f64) -> Self {
        Self {
            configurations: vec![configuration],
            scores: vec![score],
        }
    }

    /// Append one point.
    pub fn push(&mut self, configuration: Configuration, score: f64) {
        self.configurations.push(configuration);
        self.scores.push(score);
    }

    /// Append `other`, keeping its order.
    pub fn extend(&mut self, other: SeedData) {
        self.configurations.extend(other.configurations);
        self.scores.extend(other.scores);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Pairs of configuration and score, in seed order.
    pub fn iter(&self) -> impl Iterator<Item = (&Configuration, f64)> {
        self.configurations.iter().zip(self.scores.iter().copied())
    }
}

impl FromIterator<Observation> for SeedData {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        let mut seeds = SeedData::empty();
        for observation in iter {
            seeds.push(observation.configuration, observation.score);
        }
        seeds
    }
}
