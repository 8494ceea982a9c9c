// Installs the global subscriber, so this binary holds a single test.

use std::fs;

use jsc_tune::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl};
use tempfile::TempDir;
use tracing::{info, instrument, warn};

#[test]
fn test_session_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = temp_dir.path().join("2024-03-09-140507.log");

    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Json,
        log_file: Some(log_file.clone()),
        enable_console: false,
    };

    let logger = LoggerImpl::init(&config).unwrap();

    info!("Test message 1");
    info!(configuration = ?[77, 42403], "evaluated configuration");
    assert_eq!(sampled(3), 6);
    tracing::debug!("filtered out at info level");

    // Flush the non-blocking writer
    drop(logger);

    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("Test message 1"));
    assert!(contents.contains("evaluated configuration"));
    assert!(contents.contains("baseline measurement failed"));
    assert!(!contents.contains("filtered out at info level"));

    assert!(LoggerImpl::init(&config).is_err(), "second init must fail");
}

#[instrument]
fn sampled(n: u32) -> u32 {
    warn!("baseline measurement failed");
    n * 2
}
