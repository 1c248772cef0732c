//! Turns reports and errors into terminal output.
//!
//! Results go to stdout, status lines to stderr. With `--json` a single JSON
//! document goes to stdout for both success and failure.

use crate::commands::Report;
use crate::commands::operation::OperationReport;
use crate::error::SecurePropsError;

use common::ErrorLocation;

use props_core::command::OperationKind;

use std::io::Write;
use std::panic::Location;

use serde::Serialize;

pub const JAR_DOWNLOADED_MESSAGE: &str =
    "secure-properties-tool.jar has been downloaded successfully.";
pub const ENCRYPT_SUCCESS_MESSAGE: &str = "Successfully encrypted and copied to clipboard:";
pub const DECRYPT_SUCCESS_MESSAGE: &str = "Successfully decrypted and copied to clipboard:";

/// Lines destined for each stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl Rendered {
    /// Write both streams. Broken pipes are ignored.
    pub fn emit(&self) {
        let mut out = std::io::stdout().lock();
        for line in &self.stdout {
            let _ = writeln!(out, "{line}");
        }
        let mut err = std::io::stderr().lock();
        for line in &self.stderr {
            let _ = writeln!(err, "{line}");
        }
    }
}

pub fn render_text(report: &Report) -> Rendered {
    let mut rendered = Rendered::default();

    match report {
        Report::Operation(report) => render_operation(report, &mut rendered),
        Report::Plan(plan) => rendered.stdout.push(plan.command.clone()),
        Report::List(list) => {
            rendered.stdout.push("Algorithms:".to_string());
            for entry in &list.algorithms {
                rendered.stdout.push(list_line(entry.label, entry.default));
            }
            rendered.stdout.push("Modes:".to_string());
            for entry in &list.modes {
                rendered.stdout.push(list_line(entry.label, entry.default));
            }
        }
        Report::Config(config) => {
            rendered.stdout.extend([
                format!("path: {}", config.path.display()),
                format!("source: {}", config.source),
                format!("version: {}", config.version),
                format!(
                    "default_password: {}",
                    if config.default_password_set { "[set]" } else { "[not set]" }
                ),
                format!("download_timeout_secs: {}", config.download_timeout_secs),
                format!("execute_timeout_secs: {}", config.execute_timeout_secs),
            ]);
        }
        Report::ClipboardReleased => {}
        Report::ConfigPath { path } => rendered.stdout.push(path.display().to_string()),
        Report::ConfigUpdated { message } => rendered.stderr.push(message.clone()),
        Report::Fetch(fetch) => {
            if fetch.downloaded {
                rendered.stderr.push(JAR_DOWNLOADED_MESSAGE.to_string());
            } else {
                rendered.stderr.push(format!(
                    "secure-properties-tool.jar is already present at {}",
                    fetch.path.display()
                ));
            }
            rendered.stdout.push(fetch.path.display().to_string());
        }
    }

    rendered
}

fn render_operation(report: &OperationReport, rendered: &mut Rendered) {
    if report.artifact_downloaded {
        rendered.stderr.push(JAR_DOWNLOADED_MESSAGE.to_string());
    }

    if report.copied {
        let success = if report.operation == OperationKind::Encrypt.keyword() {
            ENCRYPT_SUCCESS_MESSAGE
        } else {
            DECRYPT_SUCCESS_MESSAGE
        };
        rendered.stderr.push(format!("{success} {}", report.output));
        return;
    }

    if let Some(error) = &report.clipboard_error {
        rendered.stderr.push(format!("Clipboard Error: {error}"));
    }
    rendered.stdout.push(report.output.clone());
}

fn list_line(label: &str, default: bool) -> String {
    let marker = if default { '*' } else { ' ' };
    format!("{marker} {label}")
}

pub fn render_error_text(error: &SecurePropsError) -> Rendered {
    Rendered {
        stdout: Vec::new(),
        stderr: vec![format!("{}: {}", error.title(), error.message())],
    }
}

/// # Errors
/// Returns [`SecurePropsError::App`] if serialization fails.
pub fn render_json<T: Serialize>(value: &T) -> Result<Rendered, SecurePropsError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| SecurePropsError::App {
        message: format!("Failed to serialize output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(Rendered {
        stdout: vec![json],
        stderr: Vec::new(),
    })
}
