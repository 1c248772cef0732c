//! Command construction for the Secure Properties Tool.
//!
//! The tool's CLI contract is positional and order-sensitive:
//!
//! ```text
//! java -cp "<jar>" <main-class> string <encrypt|decrypt> <algorithm> <mode> [true] "<password>" "<input>"
//! ```
//!
//! [`ShellCommand`] keeps every argument as a separate value so the process
//! layer can spawn it without a shell. The quoted one-line form is derived
//! from the same arguments and is only used for display.

pub mod request;

pub use request::{Algorithm, Mode, OperationKind, OperationRequest};

use crate::TOOL_INPUT_KIND;
use crate::config::ToolConfig;

use common::RedactedPassword;

use std::fmt;

const RANDOM_IV_FLAG: &str = "true";
const REDACTED: &str = "[REDACTED]";

/// A single argument and how it is rendered on a command line.
#[derive(Clone, PartialEq, Eq)]
pub enum CommandArg {
    /// Rendered as-is.
    Bare(String),
    /// Rendered inside double quotes.
    Quoted(String),
    /// Rendered inside double quotes; redacted in Debug/Display.
    Secret(RedactedPassword),
}

impl CommandArg {
    /// Raw value handed to the process.
    pub fn value(&self) -> &str {
        match self {
            CommandArg::Bare(v) | CommandArg::Quoted(v) => v,
            CommandArg::Secret(p) => p.expose(),
        }
    }

    fn render(&self, reveal: bool) -> String {
        match self {
            CommandArg::Bare(v) => v.clone(),
            CommandArg::Quoted(v) => format!("\"{v}\""),
            CommandArg::Secret(p) if reveal => format!("\"{}\"", p.expose()),
            CommandArg::Secret(_) => format!("\"{REDACTED}\""),
        }
    }
}

impl fmt::Debug for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// A fully built tool invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    /// Runtime arguments that select the JAR and entry point.
    launcher_args: Vec<CommandArg>,
    /// Arguments the tool itself parses.
    tool_args: Vec<CommandArg>,
}

impl ShellCommand {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector (without the program), unquoted.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.launcher_args
            .iter()
            .chain(self.tool_args.iter())
            .map(CommandArg::value)
    }

    pub fn tool_args(&self) -> &[CommandArg] {
        &self.tool_args
    }

    /// Tool parameters as one line, e.g. `string encrypt AES CBC "pw" "hello"`.
    pub fn tool_line(&self) -> String {
        render_line(&self.tool_args, true)
    }

    /// Entire command as one line with secrets revealed.
    pub fn command_line(&self) -> String {
        self.render_full(true)
    }

    /// Program and argument count only. Safe to log: carries neither the
    /// password nor the input text.
    pub fn summary(&self) -> String {
        format!(
            "{} ({} arguments)",
            self.program,
            self.launcher_args.len() + self.tool_args.len()
        )
    }

    fn render_full(&self, reveal: bool) -> String {
        format!(
            "{} {} {}",
            self.program,
            render_line(&self.launcher_args, reveal),
            render_line(&self.tool_args, reveal)
        )
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_full(false))
    }
}

impl fmt::Debug for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShellCommand({})", self.render_full(false))
    }
}

fn render_line(args: &[CommandArg], reveal: bool) -> String {
    args.iter()
        .map(|a| a.render(reveal))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds [`ShellCommand`]s against a fixed [`ToolConfig`].
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    tool: ToolConfig,
}

impl CommandBuilder {
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    /// Build the invocation for `request` using the already resolved `password`.
    ///
    /// The request's own password field is ignored; resolution against the
    /// stored default happens before this point.
    pub fn build(&self, request: &OperationRequest, password: &RedactedPassword) -> ShellCommand {
        let launcher_args = vec![
            CommandArg::Bare(self.tool.classpath_flag().to_string()),
            CommandArg::Quoted(self.tool.artifact_path().display().to_string()),
            CommandArg::Bare(self.tool.main_class().to_string()),
        ];

        ShellCommand {
            program: self.tool.java_binary().to_string(),
            launcher_args,
            tool_args: tool_args(request, password),
        }
    }
}

/// Tool parameters in contract order.
pub fn tool_args(request: &OperationRequest, password: &RedactedPassword) -> Vec<CommandArg> {
    let mut args = vec![
        CommandArg::Bare(TOOL_INPUT_KIND.to_string()),
        CommandArg::Bare(request.kind.keyword().to_string()),
        CommandArg::Bare(request.algorithm.token().to_string()),
        CommandArg::Bare(request.mode.token().to_string()),
    ];

    if request.kind == OperationKind::Encrypt && request.use_random_iv {
        args.push(CommandArg::Bare(RANDOM_IV_FLAG.to_string()));
    }

    args.push(CommandArg::Secret(password.clone()));
    args.push(CommandArg::Quoted(request.input.clone()));
    args
}

/// Escape `"`, `\` and newlines with a backslash.
///
/// For embedding a rendered command line inside another double-quoted
/// layer (e.g. an AppleScript `do shell script "..."`). The process runner
/// spawns argument vectors directly and never needs this.
pub fn escape_for_script(command: &str) -> String {
    let mut escaped = String::with_capacity(command.len());
    for c in command.chars() {
        if matches!(c, '"' | '\\' | '\n') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
