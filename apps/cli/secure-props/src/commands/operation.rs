use super::Report;
use crate::cli::OperationArgs;
use crate::clipboard::ClipboardSink;
use crate::error::SecurePropsError;

use props_core::command::{OperationKind, OperationRequest};
use props_core::exec::{CommandRunner, strip_line_terminator};
use props_core::operation::Orchestrator;

use common::ErrorLocation;

use std::io::Read;
use std::panic::Location;

use log::{debug, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// A finished encrypt/decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub operation: &'static str,
    pub output: String,
    pub copied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard_error: Option<String>,
    pub artifact_downloaded: bool,
}

/// What `--dry-run` would have executed, password redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub operation: &'static str,
    pub command: String,
}

pub fn encrypt_request(
    args: &OperationArgs,
    input: impl Read,
) -> Result<OperationRequest, SecurePropsError> {
    build_request(OperationKind::Encrypt, args, input)
}

pub fn decrypt_request(
    args: &OperationArgs,
    input: impl Read,
) -> Result<OperationRequest, SecurePropsError> {
    build_request(OperationKind::Decrypt, args, input)
}

fn build_request(
    kind: OperationKind,
    args: &OperationArgs,
    input: impl Read,
) -> Result<OperationRequest, SecurePropsError> {
    let text = read_text(args.text.as_deref(), input)?;
    let mut request = OperationRequest::new(kind, text)
        .with_algorithm(args.algorithm)
        .with_mode(args.mode);

    if let Some(password) = &args.password {
        request = request.with_password(password.clone());
    }

    Ok(request)
}

/// The positional text if given, otherwise all of `input` minus one trailing newline.
pub fn read_text(text: Option<&str>, mut input: impl Read) -> Result<String, SecurePropsError> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }

    debug!("No text argument, reading from stdin");
    let mut buffer = String::new();
    input
        .read_to_string(&mut buffer)
        .map_err(|e| SecurePropsError::Input {
            message: format!("Failed to read input from stdin: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(strip_line_terminator(&buffer).to_string())
}

/// Execute (or plan) `request` and deliver the output.
///
/// A clipboard failure does not fail the call: the output is still in the
/// report and gets printed instead.
pub async fn run<R: CommandRunner>(
    orchestrator: &Orchestrator<R>,
    request: OperationRequest,
    args: &OperationArgs,
    clipboard: &mut dyn ClipboardSink,
    cancel: &CancellationToken,
) -> Result<Report, SecurePropsError> {
    let operation = request.kind.keyword();

    if args.dry_run {
        let command = orchestrator
            .plan(request)
            .map_err(|e| SecurePropsError::from_operation(&e))?;
        return Ok(Report::Plan(PlanReport {
            operation,
            command: command.to_string(),
        }));
    }

    let outcome = orchestrator
        .execute(request, cancel)
        .await
        .map_err(|e| SecurePropsError::from_operation(&e))?;

    let (copied, clipboard_error) = if args.print {
        (false, None)
    } else {
        match clipboard.copy(&outcome.output) {
            Ok(()) => (true, None),
            Err(e) => {
                warn!("{e}");
                (false, Some(e.message().to_string()))
            }
        }
    };

    Ok(Report::Operation(OperationReport {
        operation,
        output: outcome.output,
        copied,
        clipboard_error,
        artifact_downloaded: outcome.artifact_downloaded,
    }))
}
