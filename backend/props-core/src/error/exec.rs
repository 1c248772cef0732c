use common::ErrorLocation;

use std::error::Error as StdError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ExecError {
    #[error("Spawn Error: {message} {location}")]
    Spawn {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Execution Error: {message} {location}")]
    Failed {
        message: String,
        code: Option<i32>,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cancelled Error: {message} {location}")]
    Cancelled {
        message: String,
        location: ErrorLocation,
    },
}

impl ExecError {
    pub fn raw_message(&self) -> &str {
        match self {
            ExecError::Spawn { message, .. }
            | ExecError::Failed { message, .. }
            | ExecError::Timeout { message, .. }
            | ExecError::Cancelled { message, .. } => message,
        }
    }

    /// Exit code of the tool, when it ran and exited with one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::Failed { code, .. } => *code,
            _ => None,
        }
    }
}
