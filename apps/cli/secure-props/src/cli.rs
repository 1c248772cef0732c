use props_core::command::{Algorithm, Mode};

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "secure-props")]
#[command(version)]
#[command(about = "Encrypt and decrypt Mule secure property values")]
pub struct Cli {
    /// More log output on stderr (-v warn, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config directory (overrides SECURE_PROPS_CONFIG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Print results and errors as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Encrypt a value and copy the result to the clipboard
    Encrypt {
        #[command(flatten)]
        args: OperationArgs,

        /// Let the tool generate a random IV
        #[arg(long)]
        random_iv: bool,
    },

    /// Decrypt a value and copy the result to the clipboard
    Decrypt {
        #[command(flatten)]
        args: OperationArgs,

        /// Pass `![...]` through instead of stripping it
        #[arg(long)]
        keep_wrapper: bool,
    },

    /// List supported algorithms and modes
    List,

    /// Inspect or change stored preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Download the tool JAR if it is missing
    Fetch,

    /// Serve text from stdin on the clipboard until another application
    /// replaces it
    #[command(name = "hold-clipboard", hide = true)]
    HoldClipboard,
}

#[derive(Debug, Args)]
pub struct OperationArgs {
    /// Value to process; read from stdin when omitted
    pub text: Option<String>,

    /// Password for this call (falls back to the stored default)
    #[arg(short, long)]
    pub password: Option<String>,

    #[arg(short, long, default_value = "Blowfish", value_parser = parse_algorithm)]
    pub algorithm: Algorithm,

    #[arg(short, long, default_value = "CBC", value_parser = parse_mode)]
    pub mode: Mode,

    /// Print the result to stdout instead of copying it
    #[arg(long)]
    pub print: bool,

    /// Show the command that would run, without downloading or running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the current config (password redacted)
    Show,
    /// Store a default password (read from stdin when omitted, which keeps it
    /// out of shell history)
    SetDefaultPassword { password: Option<String> },
    /// Remove the stored default password
    ClearDefaultPassword,
    /// Print the config file path
    Path,
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse::<Algorithm>().map_err(|e| e.reason())
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| e.reason())
}
