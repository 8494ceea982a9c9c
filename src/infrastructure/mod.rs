//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - Retry policy for benchmark invocations
//! - Session artifact storage

pub mod config;
pub mod logging;
pub mod retry;
pub mod storage;
