//! Adapters implementing the domain ports.

pub mod benchmarks;
pub mod minimizer;
pub mod ssh;
