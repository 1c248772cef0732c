use common::ErrorLocation;

use props_core::error::OperationError;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the command-line application.
///
/// Rendered on stderr in text mode and serialized as-is with `--json`, so
/// every variant carries plain strings plus the location it was raised at.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SecurePropsError {
    /// Error from this app (logger, runtime, I/O)
    #[error("Secure Props Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Config directory or file could not be resolved, read or written
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Input text could not be read
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    /// Result could not be placed on the clipboard
    #[error("Clipboard Error: {message} {location}")]
    Clipboard {
        message: String,
        location: ErrorLocation,
    },

    /// Encrypt/decrypt failed; `title` and `message` are user-facing
    #[error("{title}: {message} {location}")]
    Operation {
        title: String,
        message: String,
        location: ErrorLocation,
    },
}

impl SecurePropsError {
    /// Headline for the stderr status line.
    pub fn title(&self) -> &str {
        match self {
            SecurePropsError::App { .. } => "Error",
            SecurePropsError::Config { .. } => "Config Error",
            SecurePropsError::Input { .. } => "Input Error",
            SecurePropsError::Clipboard { .. } => "Clipboard Error",
            SecurePropsError::Operation { title, .. } => title,
        }
    }

    /// Message without the type prefix or location.
    pub fn message(&self) -> &str {
        match self {
            SecurePropsError::App { message, .. }
            | SecurePropsError::Config { message, .. }
            | SecurePropsError::Input { message, .. }
            | SecurePropsError::Clipboard { message, .. }
            | SecurePropsError::Operation { message, .. } => message,
        }
    }

    /// Keeps the title and classified message, logs the full chain.
    #[track_caller]
    pub fn from_operation(error: &OperationError) -> Self {
        log::error!("{error}");
        SecurePropsError::Operation {
            title: error.title(),
            message: error.user_message(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
