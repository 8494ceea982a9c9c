//! jsc-tune - adaptive measurement and seeding for tuning JavaScriptCore
//!
//! Tunes integer engine parameters against a noisy benchmark running on a
//! remote host. Each candidate configuration is sampled adaptively until its
//! mean is precise enough, earlier sessions seed the search, and the best
//! configuration plus the full evaluation history are persisted.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the port traits
//! - **Service Layer** (`services`): sampling, history merging, session orchestration
//! - **Adapters** (`adapters`): ssh execution, benchmark channels, the built-in minimizer
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, retry, storage
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ExecutionError, MinimizerError, SamplingError, SetupError};
pub use domain::models::{
    BenchmarkKind, BestResult, Bounds, Config, Configuration, OptimizeResult, Parameter,
    ParameterSpace, SampleSummary, SessionHistory,
};
pub use domain::ports::{MeasurementChannel, Minimizer, Objective, RemoteExecutor};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AdaptiveSampler, HistoryMerger, TuningDriver};
