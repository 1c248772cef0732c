use crate::classify::ClassifiedError;
use crate::error::CoreError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Outcome of a failed encrypt/decrypt call.
///
/// Validation failures are reported verbatim. Download and execution failures
/// carry the classified explanation alongside the original error.
#[derive(Debug, ThisError)]
pub enum OperationError {
    #[error("Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Password Not Set Error: {message} {location}")]
    PasswordNotSet {
        message: String,
        location: ErrorLocation,
    },

    #[error("{operation} Error: {classified} {location}")]
    Failed {
        operation: &'static str,
        classified: ClassifiedError,
        location: ErrorLocation,
        #[source]
        source: CoreError,
    },
}

impl OperationError {
    /// Text to show the user: the message itself, no type prefix or location.
    pub fn user_message(&self) -> String {
        match self {
            OperationError::Validation { message, .. }
            | OperationError::PasswordNotSet { message, .. } => message.clone(),
            OperationError::Failed { classified, .. } => classified.to_string(),
        }
    }

    /// Short title for the notification, e.g. `Encryption Error`.
    pub fn title(&self) -> String {
        match self {
            OperationError::Validation { .. } => "Validation Error".to_string(),
            OperationError::PasswordNotSet { .. } => "Password Not Set".to_string(),
            OperationError::Failed { operation, .. } => format!("{operation} Error"),
        }
    }
}
