//! Minimizer inputs and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::history::SessionHistory;
use super::observation::Observation;
use super::parameter::{Bounds, Configuration, ParameterSpace};

/// How a minimizer picks the points it evaluates before exploiting history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialPointGenerator {
    #[default]
    Random,
    /// Latin hypercube: one point per stratum in every dimension.
    Lhs,
}

impl fmt::Display for InitialPointGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Lhs => write!(f, "lhs"),
        }
    }
}

impl FromStr for InitialPointGenerator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "lhs" => Ok(Self::Lhs),
            other => Err(format!(
                "unknown initial point generator '{other}' (expected: random, lhs)"
            )),
        }
    }
}

/// Everything a minimizer needs besides the objective itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeRequest {
    pub bounds: Vec<Bounds>,
    /// Objective evaluations to spend; seed points do not count.
    pub n_calls: usize,
    pub n_initial_points: usize,
    pub initial_point_generator: InitialPointGenerator,
    pub x0: Vec<Configuration>,
    pub y0: Vec<f64>,
    /// Observed variance of the objective at the baseline.
    pub noise: Option<f64>,
}

/// State of a finished (or checkpointed) minimization.
///
/// This is also the on-disk session history format: the objective callback
/// is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub x: Configuration,
    pub fun: f64,
    pub x_iters: Vec<Configuration>,
    pub func_vals: Vec<f64>,
    pub bounds: Vec<Bounds>,
    #[serde(default)]
    pub noise: Option<f64>,
    #[serde(default)]
    pub minimizer: String,
}

impl OptimizeResult {
    /// Build a result from every evaluated point; the best is the first
    /// minimum. Returns `None` when nothing was evaluated.
    pub fn from_evaluations(
        bounds: Vec<Bounds>,
        x_iters: Vec<Configuration>,
        func_vals: Vec<f64>,
        noise: Option<f64>,
        minimizer: impl Into<String>,
    ) -> Option<Self> {
        let best = func_vals
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (i, &y)| match best {
                Some((_, b)) if b <= y => best,
                _ => Some((i, y)),
            })?;
        let x = x_iters.get(best.0)?.clone();

        Some(Self {
            x,
            fun: best.1,
            x_iters,
            func_vals,
            bounds,
            noise,
            minimizer: minimizer.into(),
        })
    }

    /// Reinterpret the evaluations as a session history.
    pub fn to_history(&self) -> SessionHistory {
        let observations = self
            .x_iters
            .iter()
            .zip(&self.func_vals)
            .map(|(x, &y)| Observation::new(x.clone(), y))
            .collect();
        SessionHistory::new(self.bounds.clone(), observations)
    }
}

/// The user-facing best-result record written at session end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestResult {
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub score: f64,
}

impl BestResult {
    /// `maximizing` flips the internal minimized value back to the
    /// benchmark's own orientation.
    pub fn new(space: &ParameterSpace, configuration: &[i64], objective: f64, maximizing: bool) -> Self {
        let parameters = space
            .named(configuration)
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
            .collect();
        let score = if maximizing { -objective } else { objective };
        Self { parameters, score }
    }
}
