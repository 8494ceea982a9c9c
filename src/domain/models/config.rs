use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::benchmark::BenchmarkKind;
use super::optimize::InitialPointGenerator;
use super::parameter::{jsc_inlining_parameters, Parameter};

/// Main configuration structure for jsc-tune
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote host access
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Benchmark selection and location
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Adaptive sampling policy
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Invocation-level retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Minimizer settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Artifacts and history inputs
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tunable parameters, in coordinate order
    #[serde(default = "jsc_inlining_parameters")]
    pub parameters: Vec<Parameter>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            benchmark: BenchmarkConfig::default(),
            sampling: SamplingConfig::default(),
            retry: RetryConfig::default(),
            optimizer: OptimizerConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            parameters: jsc_inlining_parameters(),
        }
    }
}

/// Remote host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoteConfig {
    /// `host` or `user@host` as understood by ssh
    #[serde(default)]
    pub host: Option<String>,

    /// ssh identity file
    #[serde(default)]
    pub ssh_id: Option<PathBuf>,

    /// Extra ssh/scp options
    #[serde(default = "default_ssh_options")]
    pub ssh_options: Vec<String>,
}

fn default_ssh_options() -> Vec<String> {
    vec!["-o".to_string(), "StrictHostKeyChecking=no".to_string()]
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: None,
            ssh_id: None,
            ssh_options: default_ssh_options(),
        }
    }
}

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub kind: BenchmarkKind,

    /// Engine executable on the remote host
    #[serde(default = "default_engine_path")]
    pub engine_path: String,

    /// Benchmark directory on the remote host
    #[serde(default = "default_remote_path")]
    pub remote_path: String,

    /// Local benchmark copy to deploy to `remote_path` before tuning
    #[serde(default)]
    pub local_path: Option<PathBuf>,

    /// Prefix of the environment variables carrying parameter values
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
}

fn default_engine_path() -> String {
    "jsc".to_string()
}

fn default_remote_path() -> String {
    "JetStream2".to_string()
}

fn default_env_prefix() -> String {
    "JSC_".to_string()
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            kind: BenchmarkKind::default(),
            engine_path: default_engine_path(),
            remote_path: default_remote_path(),
            local_path: None,
            env_prefix: default_env_prefix(),
        }
    }
}

/// Adaptive sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SamplingConfig {
    /// Maximum benchmark runs per candidate configuration
    #[serde(default = "default_repeats")]
    pub repeats: u32,

    /// Maximum benchmark runs for the baseline at the defaults
    #[serde(default = "default_pre_run")]
    pub pre_run: u32,

    /// Stop sampling once `z * stderr / |mean|` falls to this value
    #[serde(default = "default_confidence_target")]
    pub confidence_target: f64,

    /// Two-sided confidence coefficient (1.96 for ~95%)
    #[serde(default = "default_confidence_coefficient")]
    pub confidence_coefficient: f64,
}

const fn default_repeats() -> u32 {
    5
}

const fn default_pre_run() -> u32 {
    5
}

const fn default_confidence_target() -> f64 {
    0.02
}

const fn default_confidence_coefficient() -> f64 {
    1.96
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            pre_run: default_pre_run(),
            confidence_target: default_confidence_target(),
            confidence_coefficient: default_confidence_coefficient(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Invocations of one benchmark run before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds (0 disables waiting)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum delay between retries in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    8_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Minimizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    /// Objective evaluations to spend
    #[serde(default = "default_n_calls")]
    pub n_calls: usize,

    /// Evaluations drawn from the initial point generator
    #[serde(default = "default_initial_points")]
    pub initial_points: usize,

    #[serde(default)]
    pub initial_point_generator: InitialPointGenerator,

    /// Seed for reproducible searches
    #[serde(default)]
    pub random_state: Option<u64>,

    /// Objective value reported for configurations that could not be measured
    #[serde(default = "default_penalty")]
    pub penalty: f64,
}

const fn default_n_calls() -> usize {
    75
}

const fn default_initial_points() -> usize {
    10
}

const fn default_penalty() -> f64 {
    1e100
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            n_calls: default_n_calls(),
            initial_points: default_initial_points(),
            initial_point_generator: InitialPointGenerator::default(),
            random_state: None,
            penalty: default_penalty(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    /// Directory receiving logs, results and dumps
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Dumps of earlier sessions used as seed data
    #[serde(default)]
    pub previous_results: Vec<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./jsc-tune-results")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            previous_results: vec![],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
