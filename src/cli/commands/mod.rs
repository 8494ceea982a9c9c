//! CLI command implementations.

pub mod benchmarks;
pub mod history;
pub mod run;
