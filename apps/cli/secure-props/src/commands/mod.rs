//! Subcommand implementations.
//!
//! Each command returns a [`Report`] and never prints; rendering lives in
//! [`crate::output`] so text and JSON modes share one code path.

pub mod config;
pub mod fetch;
pub mod list;
pub mod operation;

use crate::cli::{Cli, Commands};
use crate::clipboard::ClipboardSink;
use crate::error::SecurePropsError;

use props_core::config::{AppConfig, ConfigPaths, ToolConfig, detect_config_dir};
use props_core::exec::ProcessRunner;
use props_core::operation::Orchestrator;

use common::ErrorLocation;

use std::io::stdin;
use std::panic::Location;
use std::path::PathBuf;

use log::info;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Result of one subcommand, rendered by [`crate::output`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Operation(operation::OperationReport),
    Plan(operation::PlanReport),
    List(list::ListReport),
    Config(config::ConfigReport),
    ConfigPath { path: PathBuf },
    ConfigUpdated { message: String },
    Fetch(fetch::FetchReport),
    ClipboardReleased,
}

/// Resolved configuration shared by all subcommands.
#[derive(Debug, Clone)]
pub struct Context {
    pub paths: ConfigPaths,
    pub config: AppConfig,
    pub tool: ToolConfig,
}

impl Context {
    /// Resolve the config dir, load the config and locate the tool.
    ///
    /// # Errors
    /// Returns [`SecurePropsError::Config`] if any of the three fails.
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self, SecurePropsError> {
        let paths = detect_config_dir(config_dir).map_err(|e| config_error(e))?;
        info!(
            "Config dir: {} ({})",
            paths.config_dir.display(),
            paths.source
        );

        let config = AppConfig::load(&paths.config_dir).map_err(|e| config_error(e))?;
        let tool = ToolConfig::detect().map_err(|e| config_error(e))?;

        Ok(Self {
            paths,
            config,
            tool,
        })
    }
}

/// Run the parsed command line.
///
/// # Errors
/// Whatever the selected subcommand returns.
pub async fn dispatch(
    cli: Cli,
    clipboard: &mut dyn ClipboardSink,
    cancel: &CancellationToken,
) -> Result<Report, SecurePropsError> {
    match cli.command {
        Commands::List => Ok(Report::List(list::run())),
        Commands::Encrypt { args, random_iv } => {
            let context = Context::load(cli.config_dir)?;
            let orchestrator = production_orchestrator(&context)?;
            let request =
                operation::encrypt_request(&args, stdin().lock())?.with_random_iv(random_iv);
            operation::run(&orchestrator, request, &args, clipboard, cancel).await
        }
        Commands::Decrypt { args, keep_wrapper } => {
            let context = Context::load(cli.config_dir)?;
            let orchestrator = production_orchestrator(&context)?;
            let request = operation::decrypt_request(&args, stdin().lock())?
                .with_strip_wrapper(!keep_wrapper);
            operation::run(&orchestrator, request, &args, clipboard, cancel).await
        }
        Commands::Config { action } => {
            let mut context = Context::load(cli.config_dir)?;
            config::run(&mut context, action, stdin().lock())
        }
        Commands::Fetch => {
            let context = Context::load(cli.config_dir)?;
            fetch::run(&context, cancel).await.map(Report::Fetch)
        }
        Commands::HoldClipboard => {
            crate::clipboard::hold(stdin().lock()).map(|()| Report::ClipboardReleased)
        }
    }
}

#[track_caller]
fn production_orchestrator(
    context: &Context,
) -> Result<Orchestrator<ProcessRunner>, SecurePropsError> {
    Orchestrator::from_config(context.tool.clone(), &context.config).map_err(|e| {
        SecurePropsError::App {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })
}

#[track_caller]
pub(crate) fn config_error(error: impl std::fmt::Display) -> SecurePropsError {
    SecurePropsError::Config {
        message: error.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
