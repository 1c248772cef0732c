pub mod artifact;
pub mod config;
pub mod exec;
pub mod operation;
pub mod request;

pub use artifact::DownloadError;
pub use config::ConfigError;
pub use exec::ExecError;
pub use operation::OperationError;
pub use request::RequestError;

use thiserror::Error;

/// Failures raised by the external-facing steps of an operation.
///
/// These are the errors that get classified before reaching the user.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl CoreError {
    /// The underlying message without type prefix or location suffix.
    pub fn raw_message(&self) -> &str {
        match self {
            CoreError::Download(e) => e.raw_message(),
            CoreError::Exec(e) => e.raw_message(),
        }
    }
}
