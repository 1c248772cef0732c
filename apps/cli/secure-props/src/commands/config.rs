use super::operation::read_text;
use super::{Context, Report, config_error};
use crate::cli::ConfigAction;
use crate::error::SecurePropsError;

use props_core::config::AppConfig;

use common::ErrorLocation;

use std::io::Read;
use std::panic::Location;
use std::path::PathBuf;

use log::info;
use serde::Serialize;

pub const PASSWORD_SAVED_MESSAGE: &str = "Default password saved.";
pub const PASSWORD_CLEARED_MESSAGE: &str = "Default password cleared.";
pub const EMPTY_PASSWORD_MESSAGE: &str = "Default password must not be empty.";

/// Current config as shown by `config show`. Never contains the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub path: PathBuf,
    pub source: String,
    pub version: u32,
    pub default_password_set: bool,
    pub download_timeout_secs: u64,
    pub execute_timeout_secs: u64,
}

impl ConfigReport {
    pub fn from_context(context: &Context) -> Self {
        let config = &context.config;
        Self {
            path: AppConfig::file_path(&context.paths.config_dir),
            source: context.paths.source.to_string(),
            version: config.version,
            default_password_set: config.preferences.default_password().is_some(),
            download_timeout_secs: config.timeouts.download_timeout_secs,
            execute_timeout_secs: config.timeouts.execute_timeout_secs,
        }
    }
}

/// `input` supplies the password for `set-default-password` when it was not
/// given on the command line.
pub fn run(
    context: &mut Context,
    action: ConfigAction,
    input: impl Read,
) -> Result<Report, SecurePropsError> {
    match action {
        ConfigAction::Show => Ok(Report::Config(ConfigReport::from_context(context))),
        ConfigAction::Path => Ok(Report::ConfigPath {
            path: AppConfig::file_path(&context.paths.config_dir),
        }),
        ConfigAction::SetDefaultPassword { password } => {
            let password = read_text(password.as_deref(), input)?;
            if password.is_empty() {
                return Err(SecurePropsError::Input {
                    message: EMPTY_PASSWORD_MESSAGE.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            context.config.preferences.default_password = Some(password);
            save(context, PASSWORD_SAVED_MESSAGE)
        }
        ConfigAction::ClearDefaultPassword => {
            context.config.preferences.default_password = None;
            save(context, PASSWORD_CLEARED_MESSAGE)
        }
    }
}

fn save(context: &Context, message: &str) -> Result<Report, SecurePropsError> {
    context
        .config
        .save(&context.paths.config_dir)
        .map_err(|e| config_error(e))?;

    info!("{message}");
    Ok(Report::ConfigUpdated {
        message: message.to_string(),
    })
}
