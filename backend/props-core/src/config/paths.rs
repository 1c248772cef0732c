//! Platform-aware detection of the secure-props config directory.
//!
//! Lookup order:
//! 1. SECURE_PROPS_CONFIG_DIR environment variable (explicit override)
//! 2. Platform config directory via `dirs` crate
//! 3. `~/.secure-props` when only the home directory is known
//!
//! Returns Result, never silently falls back to a wrong path.

use crate::error::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::PathBuf;

use log::{debug, info, warn};

pub const CONFIG_DIR_ENV_VAR: &str = "SECURE_PROPS_CONFIG_DIR";
const APP_DIR_NAME: &str = "secure-props";
const HOME_FALLBACK_DIR_NAME: &str = ".secure-props";

/// Config directory detection result.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub source: PathSource,
}

/// How the path was determined (for debugging/logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Passed explicitly (e.g. `--config-dir`).
    Explicit,
    /// Set via SECURE_PROPS_CONFIG_DIR.
    EnvVar,
    /// Platform config directory (XDG/AppData/Library).
    PlatformDefault,
    /// `~/.secure-props`.
    HomeFallback,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::Explicit => write!(f, "explicit"),
            PathSource::EnvVar => write!(f, "{CONFIG_DIR_ENV_VAR}"),
            PathSource::PlatformDefault => write!(f, "platform default"),
            PathSource::HomeFallback => write!(f, "home fallback"),
        }
    }
}

/// Resolve the config directory, honoring an explicit override first.
///
/// # Errors
/// Returns [`ConfigError::DirectoryNotFound`] if no candidate can be determined.
#[track_caller]
pub fn detect_config_dir(explicit: Option<PathBuf>) -> Result<ConfigPaths, ConfigError> {
    if let Some(config_dir) = explicit {
        debug!("Using explicit config dir: {}", config_dir.display());
        return Ok(ConfigPaths {
            config_dir,
            source: PathSource::Explicit,
        });
    }

    if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV_VAR)
        && !custom_dir.is_empty()
    {
        let config_dir = PathBuf::from(custom_dir);
        info!(
            "Using {CONFIG_DIR_ENV_VAR} override: {}",
            config_dir.display()
        );
        return Ok(ConfigPaths {
            config_dir,
            source: PathSource::EnvVar,
        });
    }

    if let Some(dir) = dirs::config_dir() {
        let config_dir = dir.join(APP_DIR_NAME);
        debug!("Platform config dir: {}", config_dir.display());
        return Ok(ConfigPaths {
            config_dir,
            source: PathSource::PlatformDefault,
        });
    }

    if let Some(home) = dirs::home_dir() {
        let config_dir = home.join(HOME_FALLBACK_DIR_NAME);
        warn!("Using home fallback config dir: {}", config_dir.display());
        return Ok(ConfigPaths {
            config_dir,
            source: PathSource::HomeFallback,
        });
    }

    Err(ConfigError::DirectoryNotFound {
        location: ErrorLocation::from(Location::caller()),
        reason: format!(
            "Cannot determine config directory. Set {CONFIG_DIR_ENV_VAR} environment variable."
        ),
    })
}
