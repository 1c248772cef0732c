use crate::cli::{Cli, Commands};
use crate::clipboard::{HOLD_COMMAND, hold};
use crate::error::SecurePropsError;

use std::io::{self, Read};

use clap::{CommandFactory, Parser};

/// **VALUE**: Verifies the holder's subcommand name is one the CLI actually accepts.
///
/// **WHY THIS MATTERS**: The holder is started by re-running this binary with
/// `HOLD_COMMAND`. If the two names drift apart, every copy on Linux silently fails in a
/// detached process nobody sees.
///
/// **BUG THIS CATCHES**: Would catch renaming the hidden subcommand without updating the
/// constant.
#[test]
fn given_hold_command_name_when_parsed_then_selects_hold_clipboard() {
    // WHEN: Parsing the name the holder is started with
    let cli = Cli::try_parse_from(["secure-props", HOLD_COMMAND]).unwrap();

    // THEN: The hidden subcommand is selected
    assert!(matches!(cli.command, Commands::HoldClipboard));
}

#[test]
fn given_help_output_when_rendered_then_hold_command_is_hidden() {
    let help = Cli::command().render_help().to_string();

    assert!(!help.contains(HOLD_COMMAND), "{help}");
}

struct BrokenInput;

impl Read for BrokenInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("pipe closed"))
    }
}

/// **VALUE**: Verifies an unreadable input fails before touching the clipboard.
///
/// **WHY THIS MATTERS**: The holder must never put a truncated value on the clipboard, and
/// must fail even on machines without a display server.
///
/// **BUG THIS CATCHES**: Would catch read errors being ignored and an empty string copied.
#[test]
fn given_unreadable_input_when_holding_then_clipboard_error() {
    let err = hold(BrokenInput).unwrap_err();

    assert!(matches!(err, SecurePropsError::Clipboard { .. }), "{err:?}");
    assert!(err.message().contains("pipe closed"), "{}", err.message());
}

#[cfg(target_os = "linux")]
mod linux {
    use crate::clipboard::{HOLD_COMMAND, holder_command};

    use std::path::Path;

    /// **VALUE**: Verifies the holder re-runs this binary with only the hidden subcommand.
    ///
    /// **WHY THIS MATTERS**: The text travels over stdin. Putting it in the arguments would
    /// expose the decrypted secret in the process list.
    ///
    /// **BUG THIS CATCHES**: Would catch the copied text being passed as an argument.
    #[test]
    fn given_executable_when_holder_command_built_then_only_hold_subcommand_passed() {
        // GIVEN: The path of the running binary
        let exe = Path::new("/usr/local/bin/secure-props");

        // WHEN: Building the holder command
        let command = holder_command(exe);

        // THEN: Program is the binary and the only argument is the subcommand
        assert_eq!(command.get_program(), exe.as_os_str());
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![HOLD_COMMAND]);
    }
}
