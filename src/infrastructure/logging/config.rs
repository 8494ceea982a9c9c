use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::models::LoggingConfig;

/// Logger settings resolved for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Console output format
    pub format: LogFormat,

    /// Session log file; `None` logs to the console only
    pub log_file: Option<PathBuf>,

    /// Enable console (stderr) logging
    pub enable_console: bool,
}

/// Console log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("Invalid log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Pretty => f.write_str("pretty"),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_file: None,
            enable_console: true,
        }
    }
}

impl LogConfig {
    /// Resolve the configured logging section; each `-v` raises the level
    /// one step (debug, then trace).
    pub fn from_settings(settings: &LoggingConfig, verbosity: u8) -> Result<Self, String> {
        let level = match verbosity {
            0 => settings.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };
        Ok(Self {
            level,
            format: settings.format.parse()?,
            ..Self::default()
        })
    }

    /// Also write logs to `path`.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_level() {
        let settings = LoggingConfig::default();
        assert_eq!(LogConfig::from_settings(&settings, 0).unwrap().level, "info");
        assert_eq!(LogConfig::from_settings(&settings, 1).unwrap().level, "debug");
        assert_eq!(LogConfig::from_settings(&settings, 3).unwrap().level, "trace");
    }

    #[test]
    fn test_unknown_format_rejected() {
        let settings = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(LogConfig::from_settings(&settings, 0).is_err());
    }
}
