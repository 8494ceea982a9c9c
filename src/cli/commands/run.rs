//! Implementation of the `jsc-tune run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::adapters::benchmarks::ChannelRegistry;
use crate::adapters::minimizer::SearchMinimizer;
use crate::adapters::ssh::SshExecutor;
use crate::cli::output::{create_progress_bar, output, CommandOutput};
use crate::cli::types::GlobalOptions;
use crate::domain::models::{
    BenchmarkKind, BestResult, Config, InitialPointGenerator, ParameterSpace, TrialResult,
};
use crate::domain::ports::RemoteExecutor;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::infrastructure::retry::RetryPolicy;
use crate::infrastructure::storage::ArtifactStore;
use crate::services::{
    AdaptiveSampler, Deployment, SessionContext, SessionOutcome, SessionPlan, SessionSetup,
    TrialRecord, TuningDriver,
};

/// Arguments for `jsc-tune run`. Each flag overrides the matching config key.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Remote host running the benchmark (`host` or `user@host`)
    #[arg(short, long)]
    pub remote: Option<String>,

    /// ssh identity file
    #[arg(short = 'i', long)]
    pub ssh_id: Option<PathBuf>,

    /// Path of the jsc executable on the remote host
    #[arg(short = 'j', long)]
    pub jsc_path: Option<String>,

    /// Objective evaluations to spend
    #[arg(short = 'n', long)]
    pub n_calls: Option<usize>,

    /// Benchmark runs for the baseline at the defaults (0 skips it)
    #[arg(short = 'p', long)]
    pub pre_run: Option<u32>,

    /// Directory receiving logs, results and dumps
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum benchmark runs per configuration
    #[arg(long)]
    pub repeats: Option<u32>,

    /// Relative confidence target for early stopping
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Dumps of earlier sessions to seed from (repeatable)
    #[arg(long = "previous-results", num_args = 1..)]
    pub previous_results: Vec<PathBuf>,

    /// Initial point generator: random or lhs
    #[arg(long)]
    pub initial_point_generator: Option<InitialPointGenerator>,

    /// Evaluations drawn from the initial point generator
    #[arg(long)]
    pub initial_points: Option<usize>,

    /// Local benchmark copy deployed to the remote path before tuning
    #[arg(long)]
    pub benchmark_local_path: Option<PathBuf>,

    /// Benchmark directory on the remote host
    #[arg(long)]
    pub benchmark_remote_path: Option<String>,

    /// Benchmark to run (see `jsc-tune benchmarks`)
    #[arg(short = 'b', long)]
    pub benchmark: Option<BenchmarkKind>,

    /// Seed for reproducible searches
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(remote) = &self.remote {
            config.remote.host = Some(remote.clone());
        }
        if let Some(ssh_id) = &self.ssh_id {
            config.remote.ssh_id = Some(ssh_id.clone());
        }
        if let Some(jsc_path) = &self.jsc_path {
            config.benchmark.engine_path = jsc_path.clone();
        }
        if let Some(n_calls) = self.n_calls {
            config.optimizer.n_calls = n_calls;
        }
        if let Some(pre_run) = self.pre_run {
            config.sampling.pre_run = pre_run;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.directory = output_dir.clone();
        }
        if let Some(repeats) = self.repeats {
            config.sampling.repeats = repeats;
        }
        if let Some(confidence) = self.confidence {
            config.sampling.confidence_target = confidence;
        }
        if !self.previous_results.is_empty() {
            config.output.previous_results = self.previous_results.clone();
        }
        if let Some(generator) = self.initial_point_generator {
            config.optimizer.initial_point_generator = generator;
        }
        if let Some(initial_points) = self.initial_points {
            config.optimizer.initial_points = initial_points;
        }
        if let Some(local_path) = &self.benchmark_local_path {
            config.benchmark.local_path = Some(local_path.clone());
        }
        if let Some(remote_path) = &self.benchmark_remote_path {
            config.benchmark.remote_path = remote_path.clone();
        }
        if let Some(kind) = self.benchmark {
            config.benchmark.kind = kind;
        }
        if let Some(seed) = self.seed {
            config.optimizer.random_state = Some(seed);
        }
    }
}

/// Summary printed when a session finishes.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub session: String,
    pub benchmark: String,
    pub best: BestResult,
    pub baseline: Option<f64>,
    pub evaluations: usize,
    pub seed_points: usize,
    pub failed_trials: usize,
    pub result_path: PathBuf,
    pub dump_path: PathBuf,
}

impl RunOutput {
    fn new(context: &SessionContext, kind: BenchmarkKind, outcome: SessionOutcome) -> Self {
        let baseline = outcome.baseline.as_ref().map(|summary| {
            if kind.maximizes() {
                -summary.mean
            } else {
                summary.mean
            }
        });
        Self {
            session: context.stamp().to_string(),
            benchmark: kind.name().to_string(),
            evaluations: outcome.result.x_iters.len() - outcome.seed_points,
            seed_points: outcome.seed_points,
            failed_trials: outcome.failed_trials,
            baseline,
            best: outcome.best,
            result_path: outcome.result_path,
            dump_path: outcome.dump_path,
        }
    }
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Session {} ({}): {} evaluations, {} seed points, {} failed",
            self.session, self.benchmark, self.evaluations, self.seed_points, self.failed_trials
        )];
        if let Some(baseline) = self.baseline {
            lines.push(format!("Baseline score: {baseline:.4}"));
        }
        lines.push(format!("Best score:     {:.4}", self.best.score));
        for (name, value) in &self.best.parameters {
            lines.push(format!("  {name} = {value}"));
        }
        lines.push(format!("Result: {}", self.result_path.display()));
        lines.push(format!("Dump:   {}", self.dump_path.display()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run one tuning session end to end.
pub async fn execute(args: RunArgs, globals: &GlobalOptions) -> Result<()> {
    let mut config = ConfigLoader::load(globals.config.as_deref())?;
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let space = ParameterSpace::new(config.parameters.clone())?;
    let context = SessionContext::create(&config.output.directory, Local::now())?;

    let log_config = LogConfig::from_settings(&config.logging, globals.verbose)
        .map_err(anyhow::Error::msg)?
        .with_log_file(context.output_dir().join(context.log_file_name()));
    let _logger = LoggerImpl::init(&log_config)?;
    info!(
        session = context.stamp(),
        benchmark = %config.benchmark.kind,
        parameters = space.len(),
        "starting tuning session"
    );

    let executor: Option<Arc<dyn RemoteExecutor>> = if config.benchmark.kind.is_remote() {
        let ssh = SshExecutor::from_config(&config.remote)
            .context("A remote benchmark needs --remote or remote.host")?;
        Some(Arc::new(ssh))
    } else {
        None
    };
    let deployment = config
        .benchmark
        .local_path
        .clone()
        .filter(|_| config.benchmark.kind.is_remote())
        .map(|local_path| Deployment {
            local_path,
            remote_path: config.benchmark.remote_path.clone(),
        });
    let context = SessionSetup::new(executor.clone())
        .prepare(context, deployment)
        .await?;

    let channel = ChannelRegistry::new(executor)
        .with_retry_policy(RetryPolicy::from_config(&config.retry))
        .with_seed(config.optimizer.random_state)
        .create(&config.benchmark, &space)
        .with_context(|| format!("No measurement channel for {}", config.benchmark.kind))?;
    let sampler = AdaptiveSampler::new(channel)
        .with_confidence_coefficient(config.sampling.confidence_coefficient);
    let minimizer = Arc::new(SearchMinimizer::new(config.optimizer.random_state));

    let mut driver = TuningDriver::new(
        space,
        sampler,
        minimizer,
        ArtifactStore::for_session(&context),
    );

    let progress = (!globals.json && !args.no_progress)
        .then(|| create_progress_bar(config.optimizer.n_calls as u64));
    if let Some(pb) = progress.clone() {
        driver = driver.with_trial_observer(Box::new(move |record: &TrialRecord| {
            pb.inc(1);
            pb.set_message(match &record.result {
                TrialResult::Success(summary) => format!("last {:.3}", summary.mean),
                TrialResult::Failed(_) => "last failed".to_string(),
            });
        }));
    }

    let plan = SessionPlan::from_config(&config);
    let outcome = driver
        .run_session(&config.output.previous_results, &plan)
        .await
        .context("Tuning session failed")?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    output(
        &RunOutput::new(&context, config.benchmark.kind, outcome),
        globals.json,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_only_given_flags() {
        let mut config = Config::default();
        let args = RunArgs {
            remote: Some("perf-box".into()),
            n_calls: Some(12),
            benchmark: Some(BenchmarkKind::Mock),
            previous_results: vec![PathBuf::from("a-dump.json")],
            ..Default::default()
        };

        args.apply(&mut config);

        assert_eq!(config.remote.host.as_deref(), Some("perf-box"));
        assert_eq!(config.optimizer.n_calls, 12);
        assert_eq!(config.benchmark.kind, BenchmarkKind::Mock);
        assert_eq!(config.output.previous_results, vec![PathBuf::from("a-dump.json")]);
        assert_eq!(config.sampling.repeats, 5);
        assert_eq!(config.benchmark.engine_path, "jsc");
    }
}
