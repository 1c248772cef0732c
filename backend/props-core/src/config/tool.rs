use crate::error::ConfigError;
use crate::{
    ARTIFACT_DOWNLOAD_URL, ARTIFACT_FILE_NAME, CLASSPATH_FLAG, JAVA_BINARY, TOOL_MAIN_CLASS,
};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use url::Url;

/// Fixed description of the external tool and where it lives.
///
/// Built once at startup and handed to the artifact manager and command
/// builder. Nothing in here is user-configurable; the `with_*` methods exist
/// for mirrors and tests.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    home_dir: PathBuf,
    artifact_path: PathBuf,
    download_url: Url,
    java_binary: String,
    classpath_flag: String,
    main_class: String,
}

impl ToolConfig {
    /// Tool layout rooted at `home_dir`.
    #[track_caller]
    pub fn new(home_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let home_dir = home_dir.into();
        let artifact_path = home_dir.join(ARTIFACT_FILE_NAME);

        Ok(Self {
            home_dir,
            artifact_path,
            download_url: parse_url(ARTIFACT_DOWNLOAD_URL)?,
            java_binary: JAVA_BINARY.to_string(),
            classpath_flag: CLASSPATH_FLAG.to_string(),
            main_class: TOOL_MAIN_CLASS.to_string(),
        })
    }

    /// Tool layout rooted at the current user's home directory.
    #[track_caller]
    pub fn detect() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: "Cannot determine home directory for the tool artifact".to_string(),
        })?;

        Self::new(home)
    }

    #[track_caller]
    pub fn with_download_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.download_url = parse_url(url)?;
        Ok(self)
    }

    pub fn with_java_binary(mut self, java_binary: impl Into<String>) -> Self {
        self.java_binary = java_binary.into();
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn download_url(&self) -> &Url {
        &self.download_url
    }

    pub fn java_binary(&self) -> &str {
        &self.java_binary
    }

    pub fn classpath_flag(&self) -> &str {
        &self.classpath_flag
    }

    pub fn main_class(&self) -> &str {
        &self.main_class
    }
}

#[track_caller]
fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|e| ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: format!("Invalid download URL '{url}': {e}"),
    })
}
