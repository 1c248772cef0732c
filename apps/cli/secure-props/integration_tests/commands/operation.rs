use secure_props::cli::OperationArgs;
use secure_props::clipboard::ClipboardSink;
use secure_props::commands::Report;
use secure_props::commands::operation::{decrypt_request, encrypt_request, read_text, run};
use secure_props::error::SecurePropsError;

use props_core::ARTIFACT_FILE_NAME;
use props_core::artifact::ArtifactManager;
use props_core::command::{Algorithm, CommandBuilder, Mode, ShellCommand};
use props_core::config::{Preferences, ToolConfig};
use props_core::error::ExecError;
use props_core::exec::CommandRunner;
use props_core::operation::Orchestrator;

use common::ErrorLocation;

use std::io::Cursor;
use std::panic::Location;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct EchoRunner {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CommandRunner for EchoRunner {
    async fn run(
        &self,
        command: &ShellCommand,
        _cancel: &CancellationToken,
    ) -> Result<String, ExecError> {
        self.calls.lock().unwrap().push(command.tool_line());
        Ok("result==".to_string())
    }
}

struct FailingRunner;

impl CommandRunner for FailingRunner {
    async fn run(
        &self,
        _command: &ShellCommand,
        _cancel: &CancellationToken,
    ) -> Result<String, ExecError> {
        Err(ExecError::Failed {
            message: "java.lang.IllegalArgumentException: Illegal key size".to_string(),
            code: Some(1),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[derive(Default)]
struct MemoryClipboard {
    contents: Option<String>,
    fail: bool,
}

impl ClipboardSink for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<(), SecurePropsError> {
        if self.fail {
            return Err(SecurePropsError::Clipboard {
                message: "no display".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

fn args(text: Option<&str>) -> OperationArgs {
    OperationArgs {
        text: text.map(str::to_string),
        password: Some("pw".to_string()),
        algorithm: Algorithm::Aes,
        mode: Mode::Cbc,
        print: false,
        dry_run: false,
    }
}

fn orchestrator<R: CommandRunner>(home: &TempDir, runner: R) -> Orchestrator<R> {
    std::fs::write(home.path().join(ARTIFACT_FILE_NAME), b"jar").unwrap();
    let tool = ToolConfig::new(home.path()).unwrap();
    let artifacts = Arc::new(ArtifactManager::new(&tool, None).unwrap());
    Orchestrator::new(
        artifacts,
        CommandBuilder::new(tool),
        runner,
        Preferences::default(),
    )
}

/// **VALUE**: Verifies the full encrypt path lands the tool output on the clipboard.
///
/// **WHY THIS MATTERS**: Copy-to-clipboard is the primary delivery mechanism; the
/// success line claims it happened.
///
/// **BUG THIS CATCHES**: Would catch the copy step being skipped or copying the input.
#[tokio::test]
async fn given_encrypt_args_when_run_then_output_is_copied() {
    // GIVEN: An orchestrator whose tool echoes a fixed result
    let home = TempDir::new().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = orchestrator(
        &home,
        EchoRunner {
            calls: Arc::clone(&calls),
        },
    );
    let args = args(Some("hello"));
    let request = encrypt_request(&args, Cursor::new(Vec::new())).unwrap();
    let mut clipboard = MemoryClipboard::default();

    // WHEN: Running the operation
    let report = run(
        &orchestrator,
        request,
        &args,
        &mut clipboard,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    // THEN: Clipboard holds the result and the report says so
    assert_eq!(clipboard.contents.as_deref(), Some("result=="));
    match report {
        Report::Operation(report) => {
            assert_eq!(report.operation, "encrypt");
            assert!(report.copied);
            assert!(!report.artifact_downloaded);
        }
        other => panic!("expected operation report, got {other:?}"),
    }
    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string encrypt AES CBC "pw" "hello""#.to_string()]
    );
}

#[tokio::test]
async fn given_print_flag_when_run_then_clipboard_untouched() {
    let home = TempDir::new().unwrap();
    let orchestrator = orchestrator(
        &home,
        EchoRunner {
            calls: Arc::new(Mutex::new(Vec::new())),
        },
    );
    let mut args = args(Some("![abc]"));
    args.print = true;
    let request = decrypt_request(&args, Cursor::new(Vec::new())).unwrap();
    let mut clipboard = MemoryClipboard::default();

    let report = run(
        &orchestrator,
        request,
        &args,
        &mut clipboard,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(clipboard.contents.is_none());
    assert!(matches!(report, Report::Operation(ref r) if !r.copied && r.output == "result=="));
}

#[tokio::test]
async fn given_clipboard_failure_when_run_then_result_is_still_reported() {
    let home = TempDir::new().unwrap();
    let orchestrator = orchestrator(
        &home,
        EchoRunner {
            calls: Arc::new(Mutex::new(Vec::new())),
        },
    );
    let args = args(Some("hello"));
    let request = encrypt_request(&args, Cursor::new(Vec::new())).unwrap();
    let mut clipboard = MemoryClipboard {
        contents: None,
        fail: true,
    };

    let report = run(
        &orchestrator,
        request,
        &args,
        &mut clipboard,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    match report {
        Report::Operation(report) => {
            assert!(!report.copied);
            assert_eq!(report.clipboard_error.as_deref(), Some("no display"));
            assert_eq!(report.output, "result==");
        }
        other => panic!("expected operation report, got {other:?}"),
    }
}

/// **VALUE**: Verifies `--dry-run` neither runs the tool nor reveals the password.
///
/// **WHY THIS MATTERS**: Dry-run output ends up in terminals, scrollback and bug reports.
///
/// **BUG THIS CATCHES**: Would catch the plan using the revealed command line.
#[tokio::test]
async fn given_dry_run_when_run_then_plan_is_redacted_and_tool_not_called() {
    let home = TempDir::new().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = orchestrator(
        &home,
        EchoRunner {
            calls: Arc::clone(&calls),
        },
    );
    let mut args = args(Some("hello"));
    args.dry_run = true;
    let request = encrypt_request(&args, Cursor::new(Vec::new())).unwrap();
    let mut clipboard = MemoryClipboard::default();

    let report = run(
        &orchestrator,
        request,
        &args,
        &mut clipboard,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    match report {
        Report::Plan(plan) => {
            assert!(plan.command.contains("string encrypt AES CBC"));
            assert!(plan.command.contains("[REDACTED]"));
            assert!(!plan.command.contains("\"pw\""));
        }
        other => panic!("expected plan report, got {other:?}"),
    }
    assert!(calls.lock().unwrap().is_empty());
    assert!(clipboard.contents.is_none());
}

#[tokio::test]
async fn given_tool_failure_when_run_then_operation_error_is_classified() {
    let home = TempDir::new().unwrap();
    let orchestrator = orchestrator(&home, FailingRunner);
    let args = args(Some("hello"));
    let request = encrypt_request(&args, Cursor::new(Vec::new())).unwrap();
    let mut clipboard = MemoryClipboard::default();

    let err = run(
        &orchestrator,
        request,
        &args,
        &mut clipboard,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.title(), "Encryption Error");
    assert!(err.message().starts_with("The key size is not supported."));
    assert!(clipboard.contents.is_none());
}

#[test]
fn given_no_text_when_reading_then_stdin_is_used_without_trailing_newline() {
    let text = read_text(None, Cursor::new(b"from stdin\n".to_vec())).unwrap();

    assert_eq!(text, "from stdin");
}

#[test]
fn given_text_argument_when_reading_then_stdin_is_ignored() {
    let text = read_text(Some("arg"), Cursor::new(b"stdin".to_vec())).unwrap();

    assert_eq!(text, "arg");
}

#[test]
fn given_multiline_stdin_when_reading_then_only_last_newline_is_removed() {
    let text = read_text(None, Cursor::new(b"a\nb\n\n".to_vec())).unwrap();

    assert_eq!(text, "a\nb\n");
}
