use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::errors::SetupError;
use crate::domain::models::config::Config;
use crate::domain::models::ParameterSpace;

/// Project configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "jsc-tune.yaml";

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "JSC_TUNE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {field}: {value}. Must be at least 1")]
    ZeroSamples { field: &'static str, value: u32 },

    #[error("Invalid confidence_target: {0}. Must be positive")]
    InvalidConfidenceTarget(f64),

    #[error("Invalid confidence_coefficient: {0}. Must be positive")]
    InvalidConfidenceCoefficient(f64),

    #[error("Invalid max_attempts: {0}. Cannot be 0")]
    InvalidMaxAttempts(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid penalty: {0}. Must be finite")]
    InvalidPenalty(f64),

    #[error("Benchmark {0} runs remotely but no remote host is configured")]
    MissingRemoteHost(String),

    #[error(transparent)]
    InvalidParameters(#[from] SetupError),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `path`, or `jsc-tune.yaml` in the working directory when `None`
    /// 3. Environment variables (`JSC_TUNE_*`, nested with `__`)
    ///
    /// Command-line flags are applied on top by the caller, which then
    /// calls [`ConfigLoader::validate`].
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if path.is_some() && !file.exists() {
            anyhow::bail!("Config file not found: {}", file.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration (file: {})", file.display()))?;

        Ok(config)
    }

    /// Validate configuration after loading and command-line overrides
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.sampling.repeats == 0 {
            return Err(ConfigError::ZeroSamples {
                field: "repeats",
                value: 0,
            });
        }

        let confidence_target = config.sampling.confidence_target;
        if !(confidence_target > 0.0 && confidence_target.is_finite()) {
            return Err(ConfigError::InvalidConfidenceTarget(confidence_target));
        }

        let z = config.sampling.confidence_coefficient;
        if !(z > 0.0 && z.is_finite()) {
            return Err(ConfigError::InvalidConfidenceCoefficient(z));
        }

        if config.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.retry.max_attempts));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if !config.optimizer.penalty.is_finite() {
            return Err(ConfigError::InvalidPenalty(config.optimizer.penalty));
        }

        if config.benchmark.kind.is_remote() && config.remote.host.is_none() {
            return Err(ConfigError::MissingRemoteHost(
                config.benchmark.kind.name().to_string(),
            ));
        }

        ParameterSpace::new(config.parameters.clone())?;

        Ok(())
    }
}
