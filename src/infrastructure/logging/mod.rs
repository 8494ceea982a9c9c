//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Console output on stderr (pretty or JSON)
//! - Per-session log file written through tracing-appender
//! - `RUST_LOG` overrides the configured level

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
