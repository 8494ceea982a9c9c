//! Session setup: everything that must succeed before the first measurement.
//!
//! The state established here (output location, session stamp, whether the
//! remote host was verified and the benchmark deployed) lives in a
//! [`SessionContext`] value handed to the driver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{info, instrument};

use crate::domain::errors::SetupError;
use crate::domain::ports::RemoteExecutor;

/// Command used to verify connectivity and credentials.
const CONNECTIVITY_PROBE: &str = "true";

/// Session-scoped state established before the first measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    stamp: String,
    output_dir: PathBuf,
    remote_verified: bool,
    benchmark_deployed: bool,
}

impl SessionContext {
    /// Create the output directory and stamp the session with `started_at`.
    pub fn create(output_dir: &Path, started_at: DateTime<Local>) -> Result<Self, SetupError> {
        std::fs::create_dir_all(output_dir).map_err(|e| SetupError::OutputDirectory {
            path: output_dir.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            stamp: started_at.format("%Y-%m-%d-%H%M%S").to_string(),
            output_dir: output_dir.to_path_buf(),
            remote_verified: false,
            benchmark_deployed: false,
        })
    }

    /// `YYYY-MM-DD-HHMMSS` of the session start.
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Directory holding every artifact of the session.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name of the session log.
    pub fn log_file_name(&self) -> String {
        format!("{}.log", self.stamp)
    }

    /// `<stamp>-result.json` in the output directory.
    pub fn result_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}-result.json", self.stamp))
    }

    /// `<stamp>-dump.json` in the output directory.
    pub fn dump_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}-dump.json", self.stamp))
    }

    /// Whether the remote host answered the connectivity probe.
    pub fn remote_verified(&self) -> bool {
        self.remote_verified
    }

    /// Whether the benchmark was copied to the host this session.
    pub fn benchmark_deployed(&self) -> bool {
        self.benchmark_deployed
    }
}

/// A local benchmark tree to copy to the remote host once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub local_path: PathBuf,
    pub remote_path: String,
}

/// Verifies the remote host and deploys the benchmark.
pub struct SessionSetup {
    executor: Option<Arc<dyn RemoteExecutor>>,
}

impl SessionSetup {
    /// `executor` is `None` for benchmarks measured in-process.
    pub fn new(executor: Option<Arc<dyn RemoteExecutor>>) -> Self {
        Self { executor }
    }

    /// Verify the remote host and deploy the benchmark if requested.
    ///
    /// Any failure here is fatal and reported with the triggering command.
    #[instrument(skip(self, context), fields(stamp = context.stamp()))]
    pub async fn prepare(
        &self,
        mut context: SessionContext,
        deployment: Option<Deployment>,
    ) -> Result<SessionContext, SetupError> {
        let Some(executor) = &self.executor else {
            return Ok(context);
        };

        let probe = format!("ssh {} {}", executor.host(), CONNECTIVITY_PROBE);
        let output = executor
            .execute(CONNECTIVITY_PROBE)
            .await
            .map_err(|e| SetupError::SessionSetupFailure {
                command: probe.clone(),
                message: e.to_string(),
            })?;
        if !output.success() {
            return Err(SetupError::SessionSetupFailure {
                command: probe,
                message: format!(
                    "exit status {}: {}",
                    output.status_display(),
                    output.stderr.trim()
                ),
            });
        }
        context.remote_verified = true;
        info!(host = executor.host(), "remote host reachable");

        if let Some(deployment) = deployment {
            info!(
                "Copying benchmark from {} to {} on {}",
                deployment.local_path.display(),
                deployment.remote_path,
                executor.host()
            );
            let command = format!(
                "scp -r {} {}:{}",
                deployment.local_path.display(),
                executor.host(),
                deployment.remote_path
            );
            let output = executor
                .copy_to_remote(&deployment.local_path, &deployment.remote_path)
                .await
                .map_err(|e| SetupError::SessionSetupFailure {
                    command: command.clone(),
                    message: e.to_string(),
                })?;
            if !output.success() {
                return Err(SetupError::SessionSetupFailure {
                    command,
                    message: format!(
                        "exit status {}: {}",
                        output.status_display(),
                        output.stderr.trim()
                    ),
                });
            }
            context.benchmark_deployed = true;
        }

        Ok(context)
    }
}
