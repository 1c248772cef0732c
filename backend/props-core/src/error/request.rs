use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RequestError {
    #[error("Unknown Algorithm Error: '{value}' (expected one of {expected}) {location}")]
    UnknownAlgorithm {
        value: String,
        expected: String,
        location: ErrorLocation,
    },

    #[error("Unknown Mode Error: '{value}' (expected one of {expected}) {location}")]
    UnknownMode {
        value: String,
        expected: String,
        location: ErrorLocation,
    },

    #[error("Unknown Operation Error: '{value}' (expected encrypt or decrypt) {location}")]
    UnknownOperation {
        value: String,
        location: ErrorLocation,
    },
}

impl RequestError {
    /// Description without type prefix or location, for argument parsers.
    pub fn reason(&self) -> String {
        match self {
            RequestError::UnknownAlgorithm { value, expected, .. }
            | RequestError::UnknownMode { value, expected, .. } => {
                format!("'{value}' is not one of {expected}")
            }
            RequestError::UnknownOperation { value, .. } => {
                format!("'{value}' is not encrypt or decrypt")
            }
        }
    }
}
