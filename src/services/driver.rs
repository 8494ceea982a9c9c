//! Tuning session orchestration.
//!
//! One session: baseline at the defaults, seed data from the baseline and
//! earlier sessions, the minimization loop (every candidate measured through
//! the adaptive sampler), and persistence of the outcome.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::errors::MinimizerError;
use crate::domain::models::{
    BestResult, Bounds, Config, Configuration, InitialPointGenerator, MinimizeRequest, OptimizeResult,
    ParameterSpace, SampleSummary, TrialResult,
};
use crate::domain::ports::{Minimizer, Objective};
use crate::infrastructure::storage::{self, ArtifactStore, StorageError};
use crate::services::history::HistoryMerger;
use crate::services::sampler::AdaptiveSampler;

/// Failures that end a session.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Minimizer failed: {0}")]
    Minimizer(#[from] MinimizerError),
}

/// Budgets and policies of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    /// Sample cap per candidate configuration.
    pub max_samples: u32,
    /// Sample cap for the baseline; 0 skips the baseline.
    pub pre_run_samples: u32,
    pub confidence_target: f64,
    pub n_calls: usize,
    pub n_initial_points: usize,
    pub initial_point_generator: InitialPointGenerator,
    /// Objective value substituted for configurations that cannot be measured.
    pub penalty: f64,
    /// Whether the benchmark's raw score is maximized (reported negated back).
    pub maximizing: bool,
}

impl SessionPlan {
    /// Plan a session from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_samples: config.sampling.repeats,
            pre_run_samples: config.sampling.pre_run,
            confidence_target: config.sampling.confidence_target,
            n_calls: config.optimizer.n_calls,
            n_initial_points: config.optimizer.initial_points,
            initial_point_generator: config.optimizer.initial_point_generator,
            penalty: config.optimizer.penalty,
            maximizing: config.benchmark.kind.maximizes(),
        }
    }
}

/// One evaluated candidate, as reported to a [`TrialObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// 1-based index among this session's evaluations.
    pub index: usize,
    pub configuration: Configuration,
    pub result: TrialResult,
    pub objective: f64,
}

/// Callback run after every trial, once the checkpoint is written.
pub type TrialObserver = Box<dyn Fn(&TrialRecord) + Send + Sync>;

/// Everything a finished session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub best: BestResult,
    pub result: OptimizeResult,
    pub baseline: Option<SampleSummary>,
    pub seed_points: usize,
    pub failed_trials: usize,
    pub result_path: PathBuf,
    pub dump_path: PathBuf,
}

/// Runs a tuning session: baseline, seeding, minimization and persistence.
pub struct TuningDriver {
    space: ParameterSpace,
    sampler: AdaptiveSampler,
    minimizer: Arc<dyn Minimizer>,
    store: ArtifactStore,
    observer: Option<TrialObserver>,
}

impl TuningDriver {
    /// Wire the driver to its collaborators.
    pub fn new(
        space: ParameterSpace,
        sampler: AdaptiveSampler,
        minimizer: Arc<dyn Minimizer>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            space,
            sampler,
            minimizer,
            store,
            observer: None,
        }
    }

    /// Call `observer` after every evaluated candidate.
    pub fn with_trial_observer(mut self, observer: TrialObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run one full session and persist its artifacts.
    #[instrument(skip_all, fields(minimizer = self.minimizer.name(), n_calls = plan.n_calls))]
    pub async fn run_session(
        &self,
        history_files: &[PathBuf],
        plan: &SessionPlan,
    ) -> Result<SessionOutcome, DriverError> {
        let histories = storage::load_histories(history_files)?;

        let baseline = self.baseline(plan).await;
        let defaults = self.space.defaults();

        let merger = HistoryMerger::new(self.space.bounds());
        let seeds = merger.seed_with_baseline(
            baseline
                .as_ref()
                .map(|summary| summary.to_observation(defaults.clone())),
            &histories,
        );
        info!("Gonna pass as x0:\n{:?}", seeds.configurations);
        info!("Gonna pass as y0:\n{:?}", seeds.scores);

        let noise = baseline.as_ref().and_then(|summary| summary.variance);
        let request = MinimizeRequest {
            bounds: self.space.bounds(),
            n_calls: plan.n_calls,
            n_initial_points: plan.n_initial_points,
            initial_point_generator: plan.initial_point_generator,
            x0: seeds.configurations.clone(),
            y0: seeds.scores.clone(),
            noise,
        };

        let mut objective = SampledObjective {
            sampler: &self.sampler,
            store: &self.store,
            observer: self.observer.as_ref(),
            plan,
            minimizer: self.minimizer.name(),
            x_iters: seeds.configurations.clone(),
            func_vals: seeds.scores.clone(),
            request_bounds: request.bounds.clone(),
            noise,
            evaluations: 0,
            failures: 0,
        };

        info!("Starting to minimize");
        let started = Instant::now();
        let result = self.minimizer.minimize(&mut objective, request).await?;
        info!(
            "{} ran in {:.1}s",
            self.minimizer.name(),
            started.elapsed().as_secs_f64()
        );

        let best = BestResult::new(&self.space, &result.x, result.fun, plan.maximizing);
        info!("best: {:?} → {}", result.x, best.score);

        self.store.write_dump(&result)?;
        self.store.write_result(&best)?;

        Ok(SessionOutcome {
            best,
            baseline,
            seed_points: seeds.len(),
            failed_trials: objective.failures,
            result,
            result_path: self.store.result_path().to_path_buf(),
            dump_path: self.store.dump_path().to_path_buf(),
        })
    }

    /// Measure the default configuration; its variance becomes the noise prior.
    async fn baseline(&self, plan: &SessionPlan) -> Option<SampleSummary> {
        if plan.pre_run_samples == 0 {
            info!("baseline measurement disabled");
            return None;
        }

        let defaults = self.space.defaults();
        match self
            .sampler
            .sample(&defaults, plan.pre_run_samples, plan.confidence_target)
            .await
        {
            Ok(summary) => {
                let named: Vec<String> = self
                    .space
                    .named(&defaults)
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                info!(
                    "With defaults ({}): result: {}, variance: {:?}",
                    named.join(", "),
                    summary.mean,
                    summary.variance
                );
                Some(summary)
            }
            Err(err) => {
                warn!(error = %err, "baseline measurement failed, continuing without seed or noise prior");
                None
            }
        }
    }
}

/// Objective handed to the minimizer: samples each candidate adaptively,
/// substitutes the penalty on failure, and checkpoints after every trial.
struct SampledObjective<'a> {
    sampler: &'a AdaptiveSampler,
    store: &'a ArtifactStore,
    observer: Option<&'a TrialObserver>,
    plan: &'a SessionPlan,
    minimizer: &'static str,
    x_iters: Vec<Configuration>,
    func_vals: Vec<f64>,
    request_bounds: Vec<Bounds>,
    noise: Option<f64>,
    evaluations: usize,
    failures: usize,
}

impl SampledObjective<'_> {
    fn checkpoint(&self) {
        let Some(state) = OptimizeResult::from_evaluations(
            self.request_bounds.clone(),
            self.x_iters.clone(),
            self.func_vals.clone(),
            self.noise,
            self.minimizer,
        ) else {
            return;
        };
        if let Err(err) = self.store.write_dump(&state) {
            warn!(error = %err, "could not checkpoint trial history");
        }
    }
}

#[async_trait::async_trait]
impl<'a> Objective for SampledObjective<'a> {
    async fn evaluate(&mut self, configuration: &[i64]) -> f64 {
        self.evaluations += 1;

        let result = match self
            .sampler
            .sample(configuration, self.plan.max_samples, self.plan.confidence_target)
            .await
        {
            Ok(summary) => TrialResult::Success(summary),
            Err(err) => {
                warn!(
                    "error while running configuration {:?}, returning arbitrary large value: {}",
                    configuration, err
                );
                self.failures += 1;
                TrialResult::Failed(err.to_string())
            }
        };
        let objective = result.objective_value(self.plan.penalty);
        info!(
            trial = self.evaluations,
            objective,
            "evaluated {:?} → {}",
            configuration,
            objective
        );

        self.x_iters.push(configuration.to_vec());
        self.func_vals.push(objective);
        self.checkpoint();

        if let Some(observer) = self.observer {
            observer(&TrialRecord {
                index: self.evaluations,
                configuration: configuration.to_vec(),
                result,
                objective,
            });
        }

        objective
    }
}
