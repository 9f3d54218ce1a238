pub mod directory;
pub mod validation;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::shell::ShellType;

pub use directory::{DirectoryCommand, DirectoryOutcome};
pub use validation::CommandValidator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_status: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    Spawn(String),
    TimedOut(Duration),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(msg) => write!(f, "Failed to execute command: {}", msg),
            Self::TimedOut(limit) => {
                write!(f, "Command timed out after {} seconds", limit.as_secs())
            }
        }
    }
}

impl std::error::Error for ExecError {}

/// Runs one command line in a shell.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &str, cwd: &Path) -> Result<CommandOutput, ExecError>;
}

pub struct ShellExecutor {
    shell_type: ShellType,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(shell_type: ShellType, timeout: Duration) -> Self {
        Self {
            shell_type,
            timeout,
        }
    }

    pub fn shell_type(&self) -> ShellType {
        self.shell_type
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(&self, command: &str, cwd: &Path) -> Result<CommandOutput, ExecError> {
        let (shell, args) = self.shell_type.get_shell_command();

        let mut cmd = Command::new(shell);
        cmd.args(args)
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(shell, command, cwd = %cwd.display(), "spawning command");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| ExecError::Spawn(e.to_string()))?,
            Err(_) => {
                tracing::warn!(command, "command timed out");
                return Err(ExecError::TimedOut(self.timeout));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        Ok(CommandOutput {
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            exit_status: output.status.code(),
        })
    }
}
