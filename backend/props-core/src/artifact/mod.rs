//! Local availability of the Secure Properties Tool JAR.
//!
//! The JAR is fetched once from a fixed URL into a fixed path and then trusted
//! as-is: it is never re-downloaded or checked against a checksum.
//!
//! Downloads stream into a `.part` sibling and are renamed over the
//! destination only once the body is complete and synced. Any failure
//! (network, disk, cancellation) removes the `.part` file, so
//! [`ArtifactManager::exists`] never reports a half-written JAR.

use crate::config::ToolConfig;
use crate::error::DownloadError;
use crate::USER_AGENT;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use log::{debug, info, warn};
use reqwest::{Client, Response};
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex as TokioMutex;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What [`ArtifactManager::ensure`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadyPresent,
    Downloaded { bytes: u64 },
}

impl EnsureOutcome {
    pub fn downloaded(&self) -> bool {
        matches!(self, EnsureOutcome::Downloaded { .. })
    }
}

/// Owns the artifact path and serializes downloads to it.
#[derive(Debug)]
pub struct ArtifactManager {
    path: PathBuf,
    partial_path: PathBuf,
    url: Url,
    client: Client,
    download_lock: TokioMutex<()>,
}

impl ArtifactManager {
    /// # Errors
    /// Returns [`DownloadError::Client`] if the HTTP client cannot be built.
    pub fn new(tool: &ToolConfig, timeout: Option<Duration>) -> Result<Self, DownloadError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| DownloadError::Client {
            message: format!("Failed to build HTTP client: {e}"),
            location: ErrorLocation::from(Location::caller()),
            source: Box::new(e),
        })?;

        let path = tool.artifact_path().to_path_buf();
        let mut partial = path.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);

        Ok(Self {
            partial_path: PathBuf::from(partial),
            path,
            url: tool.download_url().clone(),
            client,
            download_lock: TokioMutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an in-flight download is written before being renamed into place.
    pub fn partial_path(&self) -> &Path {
        &self.partial_path
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the artifact is present. No side effects.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Download the artifact unless it is already present.
    ///
    /// Concurrent callers queue on an internal lock; whoever gets it second
    /// sees the finished file and returns [`EnsureOutcome::AlreadyPresent`].
    /// The destination only appears through the final rename, so the
    /// unlocked fast path cannot observe a partial download.
    ///
    /// # Errors
    /// Returns [`DownloadError`] for non-2xx responses, transport failures,
    /// write failures and cancellation. No file is left behind in any case.
    pub async fn ensure(&self, cancel: &CancellationToken) -> Result<EnsureOutcome, DownloadError> {
        if self.exists() {
            debug!("Artifact present at {}", self.path.display());
            return Ok(EnsureOutcome::AlreadyPresent);
        }

        let _guard = self.download_lock.lock().await;

        if self.exists() {
            debug!(
                "Artifact appeared at {} while waiting for download lock",
                self.path.display()
            );
            return Ok(EnsureOutcome::AlreadyPresent);
        }

        info!("Downloading {} to {}", self.url, self.path.display());

        let response = tokio::select! {
            result = self.request() => result?,
            _ = cancel.cancelled() => return Err(cancelled()),
        };

        let mut cleanup = PartialFile::new(&self.partial_path);

        let result = match self.stream_to_file(response, cancel).await {
            Ok(bytes) => self.promote().await.map(|()| bytes),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                cleanup.keep();
                info!("Downloaded {bytes} bytes to {}", self.path.display());
                Ok(EnsureOutcome::Downloaded { bytes })
            }
            Err(e) => {
                warn!("Download failed: {e}");
                cleanup.remove().await;
                Err(e)
            }
        }
    }

    /// Send the GET and reject non-2xx before anything touches the disk.
    async fn request(&self) -> Result<Response, DownloadError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| DownloadError::Network {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
                source: Box::new(e),
            })?;

        let status = HttpStatusCode::from(response.status().as_u16());

        if !status.is_success() {
            if status.is_client_error() {
                warn!("Artifact not available at {} (HTTP {status})", self.url);
            } else if status.is_server_error() {
                warn!("Download server failed for {} (HTTP {status})", self.url);
            }
            // Drain so the connection is released cleanly.
            let _ = response.bytes().await;
            return Err(DownloadError::Http {
                message: format!("Failed to download file. Status code: {status}"),
                status,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(response)
    }

    async fn stream_to_file(
        &self,
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<u64, DownloadError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error("Failed to create artifact directory", e))?;
        }

        let mut file = TokioFile::create(&self.partial_path)
            .await
            .map_err(|e| self.write_error("Failed to create artifact file", e))?;

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        loop {
            let next = tokio::select! {
                next = stream.next() => next,
                _ = cancel.cancelled() => return Err(cancelled()),
            };

            let Some(chunk) = next else { break };

            let chunk = chunk.map_err(|e| DownloadError::Network {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
                source: Box::new(e),
            })?;

            file.write_all(&chunk)
                .await
                .map_err(|e| self.write_error("Failed to write artifact", e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| self.write_error("Failed to flush artifact", e))?;
        file.sync_all()
            .await
            .map_err(|e| self.write_error("Failed to sync artifact", e))?;

        Ok(written)
    }

    /// Move the completed `.part` file over the destination.
    async fn promote(&self) -> Result<(), DownloadError> {
        tokio::fs::rename(&self.partial_path, &self.path)
            .await
            .map_err(|e| self.write_error("Failed to move artifact into place", e))
    }

    #[track_caller]
    fn write_error(&self, context: &str, source: std::io::Error) -> DownloadError {
        DownloadError::Write {
            message: format!("{context}: {source}"),
            path: self.path.clone(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}

const PARTIAL_SUFFIX: &str = ".part";

#[track_caller]
fn cancelled() -> DownloadError {
    DownloadError::Cancelled {
        message: "Download was cancelled".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Removes the `.part` file unless the download completed.
///
/// The explicit [`PartialFile::remove`] covers error returns; `Drop` covers
/// the `ensure` future being dropped mid-stream.
struct PartialFile<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn keep(&mut self) {
        self.armed = false;
    }

    async fn remove(&mut self) {
        self.armed = false;
        match tokio::fs::remove_file(self.path).await {
            Ok(()) => debug!("Removed incomplete artifact {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Error removing incomplete artifact {}: {e}",
                self.path.display()
            ),
        }
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = std::fs::remove_file(self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(
                "Error removing incomplete artifact {}: {e}",
                self.path.display()
            );
        }
    }
}
