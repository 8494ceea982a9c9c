//! Seeded stochastic search over an integer box.
//!
//! Two phases: space-filling initial points (uniform random or Latin
//! hypercube), then perturbations around the incumbent whose radius shrinks
//! linearly as the call budget is spent.

use std::collections::HashSet;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::domain::errors::MinimizerError;
use crate::domain::models::{
    Bounds, Configuration, InitialPointGenerator, MinimizeRequest, OptimizeResult,
};
use crate::domain::ports::{Minimizer, Objective};

/// Perturbation radius as a fraction of each dimension's width.
const INITIAL_RADIUS: f64 = 0.25;
const FINAL_RADIUS: f64 = 0.02;
/// Draws spent looking for a configuration not evaluated yet.
const MAX_DRAWS: usize = 16;

/// Initial design followed by a shrinking local search around the incumbent.
#[derive(Debug, Clone, Default)]
pub struct SearchMinimizer {
    random_state: Option<u64>,
}

impl SearchMinimizer {
    /// `random_state` seeds the RNG; `None` draws from entropy.
    pub fn new(random_state: Option<u64>) -> Self {
        Self { random_state }
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Map a point of the unit cube onto the integer box.
fn decode(normalized: &[f64], bounds: &[Bounds]) -> Configuration {
    normalized
        .iter()
        .zip(bounds)
        .map(|(u, b)| b.clamp(b.lo + (u * (b.width() + 1) as f64).floor() as i64))
        .collect()
}

/// Latin hypercube sampling: every dimension is split into `n_samples`
/// strata and each stratum is used exactly once.
fn sample_lhs<R: Rng>(bounds: &[Bounds], n_samples: usize, rng: &mut R) -> Vec<Configuration> {
    let strata: Vec<Vec<usize>> = bounds
        .iter()
        .map(|_| {
            let mut perm: Vec<usize> = (0..n_samples).collect();
            perm.shuffle(rng);
            perm
        })
        .collect();

    (0..n_samples)
        .map(|i| {
            let normalized: Vec<f64> = strata
                .iter()
                .map(|perm| {
                    let lower = perm[i] as f64 / n_samples as f64;
                    let upper = (perm[i] + 1) as f64 / n_samples as f64;
                    lower + rng.gen::<f64>() * (upper - lower)
                })
                .collect();
            decode(&normalized, bounds)
        })
        .collect()
}

fn sample_random<R: Rng>(bounds: &[Bounds], n_samples: usize, rng: &mut R) -> Vec<Configuration> {
    (0..n_samples)
        .map(|_| {
            let normalized: Vec<f64> = bounds.iter().map(|_| rng.gen()).collect();
            decode(&normalized, bounds)
        })
        .collect()
}

fn perturb<R: Rng>(incumbent: &[i64], bounds: &[Bounds], radius: f64, rng: &mut R) -> Configuration {
    incumbent
        .iter()
        .zip(bounds)
        .map(|(&x, b)| {
            let step = (b.width() as f64 * radius).round().max(1.0) as i64;
            b.clamp(x + rng.gen_range(-step..=step))
        })
        .collect()
}

/// Radius for perturbation step `step` out of `total`.
fn radius_at(step: usize, total: usize) -> f64 {
    if total <= 1 {
        return INITIAL_RADIUS;
    }
    let progress = step as f64 / (total - 1) as f64;
    INITIAL_RADIUS + (FINAL_RADIUS - INITIAL_RADIUS) * progress
}

fn incumbent(x_iters: &[Configuration], func_vals: &[f64]) -> Option<Configuration> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &y) in func_vals.iter().enumerate() {
        if best.map_or(true, |(_, b)| y < b) {
            best = Some((i, y));
        }
    }
    best.map(|(i, _)| x_iters[i].clone())
}

fn validate(request: &MinimizeRequest) -> Result<(), MinimizerError> {
    if request.bounds.is_empty() {
        return Err(MinimizerError::EmptySpace);
    }
    if request.x0.len() != request.y0.len() {
        return Err(MinimizerError::SeedLengthMismatch {
            x0: request.x0.len(),
            y0: request.y0.len(),
        });
    }
    for (index, x) in request.x0.iter().enumerate() {
        if x.len() != request.bounds.len() {
            return Err(MinimizerError::SeedDimension {
                index,
                expected: request.bounds.len(),
                actual: x.len(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl Minimizer for SearchMinimizer {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn minimize(
        &self,
        objective: &mut dyn Objective,
        request: MinimizeRequest,
    ) -> Result<OptimizeResult, MinimizerError> {
        validate(&request)?;

        let MinimizeRequest {
            bounds,
            n_calls,
            n_initial_points,
            initial_point_generator,
            x0,
            y0,
            noise,
        } = request;

        let mut rng = self.rng();
        let mut seen: HashSet<Configuration> = x0.iter().cloned().collect();
        let mut x_iters = x0;
        let mut func_vals = y0;

        let n_initial = n_initial_points.min(n_calls);
        let initial = match initial_point_generator {
            InitialPointGenerator::Random => sample_random(&bounds, n_initial, &mut rng),
            InitialPointGenerator::Lhs => sample_lhs(&bounds, n_initial, &mut rng),
        };
        info!(
            seeds = x_iters.len(),
            initial = initial.len(),
            generator = %initial_point_generator,
            "starting search"
        );

        for x in initial {
            let y = objective.evaluate(&x).await;
            seen.insert(x.clone());
            x_iters.push(x);
            func_vals.push(y);
        }

        let refinement = n_calls - n_initial;
        for step in 0..refinement {
            let radius = radius_at(step, refinement);
            let candidate = match incumbent(&x_iters, &func_vals) {
                Some(best) => {
                    let mut candidate = perturb(&best, &bounds, radius, &mut rng);
                    for _ in 1..MAX_DRAWS {
                        if !seen.contains(&candidate) {
                            break;
                        }
                        candidate = perturb(&best, &bounds, radius, &mut rng);
                    }
                    candidate
                }
                None => sample_random(&bounds, 1, &mut rng).remove(0),
            };

            debug!(step, radius, candidate = ?candidate, "refinement candidate");
            let y = objective.evaluate(&candidate).await;
            seen.insert(candidate.clone());
            x_iters.push(candidate);
            func_vals.push(y);
        }

        OptimizeResult::from_evaluations(bounds, x_iters, func_vals, noise, self.name())
            .ok_or(MinimizerError::NoEvaluations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Squared distance from a fixed optimum; records every call.
    struct Bowl {
        optimum: Vec<i64>,
        calls: Vec<Configuration>,
    }

    #[async_trait]
    impl Objective for Bowl {
        async fn evaluate(&mut self, configuration: &[i64]) -> f64 {
            self.calls.push(configuration.to_vec());
            configuration
                .iter()
                .zip(&self.optimum)
                .map(|(x, o)| ((x - o) * (x - o)) as f64)
                .sum()
        }
    }

    fn request(n_calls: usize, n_initial_points: usize) -> MinimizeRequest {
        MinimizeRequest {
            bounds: vec![Bounds::new(50, 180), Bounds::new(1, 5)],
            n_calls,
            n_initial_points,
            initial_point_generator: InitialPointGenerator::Lhs,
            x0: vec![],
            y0: vec![],
            noise: None,
        }
    }

    #[test]
    fn lhs_uses_every_stratum_once() {
        let bounds = vec![Bounds::new(0, 99)];
        let mut rng = StdRng::seed_from_u64(3);
        let mut points: Vec<i64> = sample_lhs(&bounds, 10, &mut rng)
            .into_iter()
            .map(|x| x[0] / 10)
            .collect();
        points.sort_unstable();
        assert_eq!(points, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn decode_reaches_both_ends() {
        let bounds = vec![Bounds::new(2, 8)];
        assert_eq!(decode(&[0.0], &bounds), vec![2]);
        assert_eq!(decode(&[0.999_999], &bounds), vec![8]);
        assert_eq!(decode(&[1.0], &bounds), vec![8]);
    }

    #[test]
    fn radius_shrinks() {
        assert_eq!(radius_at(0, 10), INITIAL_RADIUS);
        assert!((radius_at(9, 10) - FINAL_RADIUS).abs() < 1e-12);
        assert!(radius_at(5, 10) < radius_at(4, 10));
    }

    #[tokio::test]
    async fn spends_exactly_n_calls_within_bounds() {
        let mut bowl = Bowl {
            optimum: vec![120, 2],
            calls: vec![],
        };
        let result = SearchMinimizer::new(Some(1))
            .minimize(&mut bowl, request(20, 5))
            .await
            .unwrap();

        assert_eq!(bowl.calls.len(), 20);
        assert_eq!(result.x_iters.len(), 20);
        assert!(bowl.calls.iter().all(|x| (50..=180).contains(&x[0]) && (1..=5).contains(&x[1])));
        let best = result.func_vals.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(result.fun, best);
    }

    #[tokio::test]
    async fn seeds_are_registered_not_evaluated() {
        let mut bowl = Bowl {
            optimum: vec![120, 2],
            calls: vec![],
        };
        let mut req = request(3, 0);
        req.x0 = vec![vec![120, 2], vec![60, 5]];
        req.y0 = vec![0.0, 109.0];

        let result = SearchMinimizer::new(Some(9))
            .minimize(&mut bowl, req)
            .await
            .unwrap();

        assert_eq!(bowl.calls.len(), 3);
        assert!(!bowl.calls.contains(&vec![60, 5]));
        assert_eq!(result.x_iters[..2], [vec![120, 2], vec![60, 5]]);
        assert_eq!(result.x, vec![120, 2]);
        assert_eq!(result.fun, 0.0);
    }

    #[tokio::test]
    async fn same_seed_same_trajectory() {
        let run = || async {
            let mut bowl = Bowl {
                optimum: vec![100, 3],
                calls: vec![],
            };
            SearchMinimizer::new(Some(42))
                .minimize(&mut bowl, request(12, 4))
                .await
                .unwrap();
            bowl.calls
        };
        assert_eq!(run().await, run().await);
    }

    #[tokio::test]
    async fn rejects_mismatched_seeds() {
        let mut bowl = Bowl {
            optimum: vec![0, 0],
            calls: vec![],
        };
        let mut req = request(3, 1);
        req.x0 = vec![vec![60, 2]];

        let err = SearchMinimizer::default()
            .minimize(&mut bowl, req)
            .await
            .unwrap_err();
        assert!(matches!(err, MinimizerError::SeedLengthMismatch { x0: 1, y0: 0 }));
        assert!(bowl.calls.is_empty());
    }

    #[tokio::test]
    async fn zero_calls_with_seeds_returns_best_seed() {
        let mut bowl = Bowl {
            optimum: vec![0, 0],
            calls: vec![],
        };
        let mut req = request(0, 0);
        req.x0 = vec![vec![60, 2], vec![70, 1]];
        req.y0 = vec![5.0, 4.0];

        let result = SearchMinimizer::default()
            .minimize(&mut bowl, req)
            .await
            .unwrap();
        assert_eq!(result.x, vec![70, 1]);
        assert!(bowl.calls.is_empty());
    }
}
