use super::Context;
use crate::error::SecurePropsError;

use props_core::artifact::{ArtifactManager, EnsureOutcome};
use props_core::classify::explain;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use log::error;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub path: PathBuf,
    pub downloaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Make sure the tool JAR is on disk.
///
/// # Errors
/// Returns [`SecurePropsError::Operation`] with a classified message if the
/// download fails.
pub async fn run(
    context: &Context,
    cancel: &CancellationToken,
) -> Result<FetchReport, SecurePropsError> {
    let manager = ArtifactManager::new(&context.tool, context.config.timeouts.download_timeout())
        .map_err(|e| SecurePropsError::App {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    ensure(&manager, cancel).await
}

pub async fn ensure(
    manager: &ArtifactManager,
    cancel: &CancellationToken,
) -> Result<FetchReport, SecurePropsError> {
    let outcome = manager.ensure(cancel).await.map_err(|e| {
        error!("{e}");
        SecurePropsError::Operation {
            title: "Download Error".to_string(),
            message: explain(e.raw_message()),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    Ok(FetchReport {
        path: manager.path().to_path_buf(),
        downloaded: outcome.downloaded(),
        bytes: match outcome {
            EnsureOutcome::Downloaded { bytes } => Some(bytes),
            EnsureOutcome::AlreadyPresent => None,
        },
    })
}
