//! One encrypt or decrypt call, start to finish.
//!
//! Stages run in a fixed order and stop at the first failure:
//!
//! 1. validate input (empty input fails here)
//! 2. strip the `![...]` wrapper (decrypt with stripping enabled)
//! 3. make sure the tool JAR is present
//! 4. resolve the password (explicit, then stored default)
//! 5. build the command
//! 6. run it
//!
//! Validation failures are reported as-is. Download and execution failures
//! are classified first.

use crate::artifact::{ArtifactManager, EnsureOutcome};
use crate::classify::classify;
use crate::command::{CommandBuilder, OperationKind, OperationRequest, ShellCommand};
use crate::config::{AppConfig, Preferences, ToolConfig};
use crate::error::{CoreError, DownloadError, OperationError};
use crate::exec::{CommandRunner, ProcessRunner};
use crate::preprocess::strip_wrapper;

use common::{ErrorLocation, RedactedPassword};

use std::panic::Location;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

pub const REQUIRED_INPUT_MESSAGE: &str = "Input text is required.";
pub const PASSWORD_NOT_SET_MESSAGE: &str =
    "No password provided. Please enter a password or set a default in preferences.";

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub kind: OperationKind,
    /// Tool stdout, ready for the clipboard.
    pub output: String,
    /// Whether this call had to fetch the JAR first.
    pub artifact_downloaded: bool,
}

pub struct Orchestrator<R: CommandRunner> {
    artifacts: Arc<ArtifactManager>,
    builder: CommandBuilder,
    runner: R,
    preferences: Preferences,
}

impl Orchestrator<ProcessRunner> {
    /// Production wiring: process runner in the user's home, timeouts from config.
    ///
    /// # Errors
    /// Returns [`DownloadError::Client`] if the HTTP client cannot be built.
    pub fn from_config(tool: ToolConfig, config: &AppConfig) -> Result<Self, DownloadError> {
        let artifacts = Arc::new(ArtifactManager::new(
            &tool,
            config.timeouts.download_timeout(),
        )?);
        let runner = ProcessRunner::new()
            .with_working_dir(tool.home_dir())
            .with_timeout(config.timeouts.execute_timeout());

        Ok(Self::new(
            artifacts,
            CommandBuilder::new(tool),
            runner,
            config.preferences.clone(),
        ))
    }
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(
        artifacts: Arc<ArtifactManager>,
        builder: CommandBuilder,
        runner: R,
        preferences: Preferences,
    ) -> Self {
        Self {
            artifacts,
            builder,
            runner,
            preferences,
        }
    }

    pub fn artifacts(&self) -> &ArtifactManager {
        &self.artifacts
    }

    /// Run `request` through every stage.
    ///
    /// # Errors
    /// - [`OperationError::Validation`] for empty input
    /// - [`OperationError::PasswordNotSet`] when no password can be resolved
    /// - [`OperationError::Failed`] for download or execution failures
    pub async fn execute(
        &self,
        request: OperationRequest,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, OperationError> {
        let kind = request.kind;
        info!(
            "Starting {} ({} {}, {} chars)",
            kind.label(),
            request.algorithm,
            request.mode,
            request.input.chars().count()
        );

        let request = prepare_input(request)?;

        let ensured = self
            .artifacts
            .ensure(cancel)
            .await
            .map_err(|e| failed(kind, CoreError::from(e)))?;

        let password = self.resolve_password(&request)?;
        let command = self.builder.build(&request, &password);

        let output = self
            .runner
            .run(&command, cancel)
            .await
            .map_err(|e| failed(kind, CoreError::from(e)))?;

        info!("{} completed", kind.label());

        Ok(OperationOutcome {
            kind,
            output,
            artifact_downloaded: matches!(ensured, EnsureOutcome::Downloaded { .. }),
        })
    }

    /// Everything `execute` does short of downloading and running.
    ///
    /// # Errors
    /// Same validation errors as [`Orchestrator::execute`].
    pub fn plan(&self, request: OperationRequest) -> Result<ShellCommand, OperationError> {
        let request = prepare_input(request)?;
        let password = self.resolve_password(&request)?;
        Ok(self.builder.build(&request, &password))
    }

    #[track_caller]
    fn resolve_password(
        &self,
        request: &OperationRequest,
    ) -> Result<RedactedPassword, OperationError> {
        if let Some(password) = &request.password {
            debug!("Using explicit password");
            return Ok(password.clone());
        }

        if let Some(password) = self.preferences.default_password() {
            debug!("Using default password from preferences");
            return Ok(password);
        }

        warn!("No password provided and no default configured");
        Err(OperationError::PasswordNotSet {
            message: PASSWORD_NOT_SET_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Validate, then strip the wrapper for decryption when requested.
#[track_caller]
fn prepare_input(mut request: OperationRequest) -> Result<OperationRequest, OperationError> {
    if request.input.is_empty() {
        return Err(OperationError::Validation {
            message: REQUIRED_INPUT_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if request.kind == OperationKind::Decrypt && request.strip_wrapper {
        request.input = strip_wrapper(&request.input);
    }

    Ok(request)
}

#[track_caller]
fn failed(kind: OperationKind, source: CoreError) -> OperationError {
    let classified = classify(source.raw_message());
    if classified.is_fallback() {
        debug!("No known pattern for: {}", source.raw_message());
    }

    OperationError::Failed {
        operation: kind.label(),
        classified,
        location: ErrorLocation::from(Location::caller()),
        source,
    }
}
