//! Process execution for built tool commands.
//!
//! Commands are spawned directly from their argument vector. There is no
//! intermediate shell, so nothing in the password or input needs escaping.

use crate::command::ShellCommand;
use crate::error::ExecError;

use common::ErrorLocation;

use std::future::Future;
use std::panic::Location;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout as TokioTimeout;
use tokio_util::sync::CancellationToken;

/// Runs a [`ShellCommand`] and returns its standard output.
///
/// Implementations must not classify errors; they report the raw message and
/// leave interpretation to the caller.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        command: &ShellCommand,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, ExecError>> + Send;
}

/// Spawns the command as a child process.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Kill the child and fail once `timeout` elapses. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn build_command(&self, command: &ShellCommand) -> TokioCommand {
        let mut cmd = TokioCommand::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }

    async fn wait_output(
        &self,
        command: &ShellCommand,
        cancel: &CancellationToken,
    ) -> Result<Output, ExecError> {
        let child = self
            .build_command(command)
            .spawn()
            .map_err(|e| ExecError::Spawn {
                message: format!("Failed to start {}: {e}", command.program()),
                location: ErrorLocation::from(Location::caller()),
                source: Box::new(e),
            })?;

        debug!("Spawned {} (PID: {:?})", command.program(), child.id());

        // Dropping the output future drops the child, which kills it.
        let output = child.wait_with_output();

        let waited = match self.timeout {
            Some(limit) => tokio::select! {
                result = TokioTimeout(limit, output) => result.map_err(|_| ExecError::Timeout {
                    message: format!("{} did not finish within {limit:?}", command.program()),
                    location: ErrorLocation::from(Location::caller()),
                })?,
                _ = cancel.cancelled() => return Err(cancelled(command)),
            },
            None => tokio::select! {
                result = output => result,
                _ = cancel.cancelled() => return Err(cancelled(command)),
            },
        };

        waited.map_err(|e| ExecError::Spawn {
            message: format!("Failed to collect output of {}: {e}", command.program()),
            location: ErrorLocation::from(Location::caller()),
            source: Box::new(e),
        })
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &ShellCommand,
        cancel: &CancellationToken,
    ) -> Result<String, ExecError> {
        info!("Running {}", command.summary());

        let output = self.wait_output(command, cancel).await?;

        if !output.status.success() {
            let message = failure_message(&output);
            warn!(
                "{} exited with {:?}: {message}",
                command.program(),
                output.status.code()
            );
            return Err(ExecError::Failed {
                message,
                code: output.status.code(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("{} produced {} bytes of output", command.program(), stdout.len());

        Ok(strip_line_terminator(&stdout).to_string())
    }
}

#[track_caller]
fn cancelled(command: &ShellCommand) -> ExecError {
    ExecError::Cancelled {
        message: format!("{} was cancelled", command.program()),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Stderr when present, otherwise stdout, otherwise the exit status.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = strip_line_terminator(&stderr);
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = strip_line_terminator(&stdout);
    if !stdout.is_empty() {
        return stdout.to_string();
    }

    format!("Process exited with {}", output.status)
}

/// Drop exactly one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}
