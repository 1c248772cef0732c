use secure_props::cli::Cli;
use secure_props::clipboard::SystemClipboard;
use secure_props::commands;
use secure_props::logger::{
    default_log_dir, initialize as LoggerInitialize, level_for_verbosity,
};
use secure_props::output::{render_error_text, render_json, render_text};

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2 from here.
    let cli = Cli::parse();
    let json = cli.json;

    match default_log_dir() {
        Some(log_dir) => {
            if let Err(e) = LoggerInitialize(&log_dir, level_for_verbosity(cli.verbose)) {
                eprintln!("Logging disabled: {}", e.message());
            } else {
                info!("secure-props v{} starting", env!("CARGO_PKG_VERSION"));
                info!("Log directory: {}", log_dir.display());
            }
        }
        None => eprintln!("Logging disabled: no local data directory on this platform"),
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            return;
        }
        info!("Received Ctrl-C, cancelling");
        ctrl_c.cancel();
    });

    let mut clipboard = SystemClipboard::new();

    let (rendered, code) = match commands::dispatch(cli, &mut clipboard, &cancel).await {
        Ok(report) => {
            let rendered = if json {
                render_json(&report)
            } else {
                Ok(render_text(&report))
            };
            (rendered, ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{e}");
            let rendered = if json {
                render_json(&e)
            } else {
                Ok(render_error_text(&e))
            };
            (rendered, ExitCode::FAILURE)
        }
    };

    match rendered {
        Ok(rendered) => {
            rendered.emit();
            code
        }
        Err(e) => {
            eprintln!("{}: {}", e.title(), e.message());
            ExitCode::FAILURE
        }
    }
}
