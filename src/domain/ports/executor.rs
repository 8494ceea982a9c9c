//! Remote executor port - how a shell command reaches the benchmark host.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::ExecutionError;

/// Captured result of one remote command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Exited normally with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Exit status for messages; `signal` when the process was killed.
    pub fn status_display(&self) -> String {
        self.status
            .map_or_else(|| "terminated by signal".to_string(), |code| code.to_string())
    }
}

/// Executes shell commands on a remote host.
///
/// Implementations may retry connection-level problems themselves but must
/// report command-level failures as a non-zero [`CommandOutput::status`].
/// Calls block until the command finishes; there is no cancellation.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Host identifier used in diagnostics.
    fn host(&self) -> &str;

    /// Run `command` through the remote shell.
    async fn execute(&self, command: &str) -> Result<CommandOutput, ExecutionError>;

    /// Copy a local file or directory tree to `remote_path`.
    async fn copy_to_remote(
        &self,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<CommandOutput, ExecutionError>;
}
