use common::{ErrorLocation, HttpStatusCode};

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DownloadError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        status: HttpStatusCode,
        location: ErrorLocation,
    },

    #[error("Network Error: {message} {location}")]
    Network {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Write Error: {path}: {message} {location}")]
    Write {
        message: String,
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Client Error: {message} {location}")]
    Client {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Cancelled Error: {message} {location}")]
    Cancelled {
        message: String,
        location: ErrorLocation,
    },
}

impl DownloadError {
    pub fn raw_message(&self) -> &str {
        match self {
            DownloadError::Http { message, .. }
            | DownloadError::Network { message, .. }
            | DownloadError::Write { message, .. }
            | DownloadError::Client { message, .. }
            | DownloadError::Cancelled { message, .. } => message,
        }
    }

    /// Status code for HTTP rejections, `None` for every other failure.
    pub fn status(&self) -> Option<HttpStatusCode> {
        match self {
            DownloadError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
