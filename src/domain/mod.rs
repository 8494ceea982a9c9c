//! Domain layer for jsc-tune
//!
//! Core models, error types and the ports the controller talks through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ExecutionError, MinimizerError, SamplingError, SetupError};
