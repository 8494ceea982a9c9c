//! Remote execution over the system `ssh`/`scp` clients.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::errors::ExecutionError;
use crate::domain::models::RemoteConfig;
use crate::domain::ports::{CommandOutput, RemoteExecutor};

/// Runs commands on one host with `ssh [options] [-i id] host command`.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    host: String,
    identity: Option<PathBuf>,
    options: Vec<String>,
}

impl SshExecutor {
    /// `host` is anything `ssh` accepts, e.g. `user@machine`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            identity: None,
            options: Vec::new(),
        }
    }

    /// Executor for `config.host`, or `None` when no host is configured.
    pub fn from_config(config: &RemoteConfig) -> Option<Self> {
        let host = config.host.as_ref()?;
        Some(
            Self::new(host.clone())
                .with_identity(config.ssh_id.clone())
                .with_options(config.ssh_options.clone()),
        )
    }

    /// Private key passed as `-i`.
    pub fn with_identity(mut self, identity: Option<PathBuf>) -> Self {
        self.identity = identity;
        self
    }

    /// Extra `-o` options, appended after the defaults.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Arguments shared by `ssh` and `scp`.
    fn common_args(&self) -> Vec<String> {
        let mut args = self.options.clone();
        if let Some(identity) = &self.identity {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        args
    }

    /// Arguments for running `command` remotely.
    pub fn ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = self.common_args();
        args.push(self.host.clone());
        args.push(command.to_string());
        args
    }

    /// Arguments for a recursive copy to the host.
    pub fn scp_args(&self, local_path: &Path, remote_path: &str) -> Vec<String> {
        let mut args = self.common_args();
        args.push("-r".to_string());
        args.push(local_path.display().to_string());
        args.push(format!("{}:{}", self.host, remote_path));
        args
    }

    /// Verify that the host is reachable and accepts our credentials.
    pub async fn check_connectivity(&self) -> Result<bool, ExecutionError> {
        Ok(self.execute("true").await?.success())
    }

    async fn run(&self, program: &str, args: Vec<String>) -> Result<CommandOutput, ExecutionError> {
        let rendered = format!("{} {}", program, args.join(" "));
        tracing::debug!(host = %self.host, command = %rendered, "spawning");

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                tracing::error!(host = %self.host, error = %e, "Failed to spawn {}", program);
                ExecutionError::Transport {
                    command: rendered.clone(),
                    message: e.to_string(),
                }
            })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(
            host = %self.host,
            status = %result.status_display(),
            stdout_bytes = result.stdout.len(),
            "command finished"
        );
        Ok(result)
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    fn host(&self) -> &str {
        &self.host
    }

    async fn execute(&self, command: &str) -> Result<CommandOutput, ExecutionError> {
        self.run("ssh", self.ssh_args(command)).await
    }

    async fn copy_to_remote(
        &self,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<CommandOutput, ExecutionError> {
        self.run("scp", self.scp_args(local_path, remote_path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssh_args_from_config() {
        let config = RemoteConfig {
            host: Some("bench@perf-box".into()),
            ssh_id: Some(PathBuf::from("/home/bench/.ssh/id_ed25519")),
            ..Default::default()
        };
        let executor = SshExecutor::from_config(&config).unwrap();

        assert_eq!(
            executor.ssh_args("true"),
            vec![
                "-o",
                "StrictHostKeyChecking=no",
                "-i",
                "/home/bench/.ssh/id_ed25519",
                "bench@perf-box",
                "true"
            ]
        );
    }

    #[test]
    fn test_scp_args_are_recursive() {
        let executor = SshExecutor::new("perf-box");
        assert_eq!(
            executor.scp_args(Path::new("./JetStream2"), "JetStream2"),
            vec!["-r", "./JetStream2", "perf-box:JetStream2"]
        );
    }

    #[test]
    fn test_no_host_means_no_executor() {
        assert!(SshExecutor::from_config(&RemoteConfig::default()).is_none());
    }
}
