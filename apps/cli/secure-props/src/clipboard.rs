use crate::error::SecurePropsError;

use common::ErrorLocation;

use std::fmt::Display;
use std::io::Read;
use std::panic::Location;

use arboard::Clipboard;
use log::debug;

/// Hidden subcommand under which a detached copy of this binary keeps
/// copied text available after the main process exits.
pub const HOLD_COMMAND: &str = "hold-clipboard";

/// Destination for operation results.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<(), SecurePropsError>;
}

/// The desktop clipboard.
///
/// Opened only when something is copied, so commands that never copy (or
/// run headless with `--print`) do not need a display server.
///
/// On Linux the X11/Wayland selection is served by the process that set it
/// and vanishes when that process exits. Copies there go through a holder
/// process instead (see [`hold`]).
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn copy(&mut self, text: &str) -> Result<(), SecurePropsError> {
        spawn_holder(text)
    }

    #[cfg(not(target_os = "linux"))]
    fn copy(&mut self, text: &str) -> Result<(), SecurePropsError> {
        open()?
            .set_text(text.to_owned())
            .map_err(|e| clipboard_error("Failed to copy to clipboard", e))?;

        debug!("Copied {} chars to clipboard", text.chars().count());
        Ok(())
    }
}

/// Put all of `input` on the clipboard and keep serving it.
///
/// On Linux this blocks until another application takes the clipboard
/// over. Elsewhere the platform keeps the contents and this returns
/// straight away.
///
/// # Errors
/// Returns [`SecurePropsError::Clipboard`] if the input cannot be read or
/// the clipboard cannot be opened or set.
pub fn hold(mut input: impl Read) -> Result<(), SecurePropsError> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .map_err(|e| clipboard_error("Failed to read clipboard text", e))?;

    debug!("Holding {} chars on the clipboard", text.chars().count());
    let mut clipboard = open()?;
    set_and_wait(&mut clipboard, text)
        .map_err(|e| clipboard_error("Failed to copy to clipboard", e))?;

    debug!("Clipboard taken over by another application");
    Ok(())
}

/// Command line that starts a holder for text written to its stdin.
#[cfg(target_os = "linux")]
pub fn holder_command(exe: &std::path::Path) -> std::process::Command {
    use std::process::Stdio;

    let mut command = std::process::Command::new(exe);
    command
        .arg(HOLD_COMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

#[cfg(target_os = "linux")]
#[allow(clippy::zombie_processes)]
fn spawn_holder(text: &str) -> Result<(), SecurePropsError> {
    use std::io::Write;

    let exe = std::env::current_exe()
        .map_err(|e| clipboard_error("Failed to locate secure-props executable", e))?;

    // Never waited on: the holder has to outlive this process.
    let mut child = holder_command(&exe)
        .spawn()
        .map_err(|e| clipboard_error("Failed to start clipboard holder", e))?;

    let Some(mut stdin) = child.stdin.take() else {
        return Err(clipboard_error(
            "Failed to start clipboard holder",
            "stdin not captured",
        ));
    };
    stdin
        .write_all(text.as_bytes())
        .map_err(|e| clipboard_error("Failed to hand text to clipboard holder", e))?;

    debug!(
        "Clipboard holder (PID: {}) took {} chars",
        child.id(),
        text.chars().count()
    );
    Ok(())
}

#[cfg(target_os = "linux")]
fn set_and_wait(clipboard: &mut Clipboard, text: String) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    clipboard.set().wait().text(text)
}

#[cfg(not(target_os = "linux"))]
fn set_and_wait(clipboard: &mut Clipboard, text: String) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}

#[track_caller]
fn open() -> Result<Clipboard, SecurePropsError> {
    Clipboard::new().map_err(|e| clipboard_error("Failed to open clipboard", e))
}

#[track_caller]
fn clipboard_error(context: &str, error: impl Display) -> SecurePropsError {
    SecurePropsError::Clipboard {
        message: format!("{context}: {error}"),
        location: ErrorLocation::from(Location::caller()),
    }
}
