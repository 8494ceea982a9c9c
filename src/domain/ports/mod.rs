//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces for the collaborators the controller depends on:
//! - RemoteExecutor: running shell commands on the benchmark host
//! - MeasurementChannel: producing one benchmark score
//! - Minimizer / Objective: the external black-box optimizer contract

pub mod executor;
pub mod measurement;
pub mod minimizer;

pub use executor::{CommandOutput, RemoteExecutor};
pub use measurement::MeasurementChannel;
pub use minimizer::{Minimizer, Objective};
