//! Built-in minimizer implementations.

pub mod search;

pub use search::SearchMinimizer;
