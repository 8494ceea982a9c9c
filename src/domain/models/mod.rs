//! Domain models.

pub mod benchmark;
pub mod config;
pub mod history;
pub mod observation;
pub mod optimize;
pub mod parameter;

pub use benchmark::{BenchmarkKind, BenchmarkPaths};
pub use config::{
    BenchmarkConfig, Config, LoggingConfig, OptimizerConfig, OutputConfig, RemoteConfig,
    RetryConfig, SamplingConfig,
};
pub use history::{SeedData, SessionHistory};
pub use observation::{Observation, SampleSummary, TrialResult};
pub use optimize::{BestResult, InitialPointGenerator, MinimizeRequest, OptimizeResult};
pub use parameter::{
    jsc_inlining_parameters, within_bounds, Bounds, Configuration, Parameter, ParameterSpace,
};
