// Process runner tests use small shell scripts standing in for `java`.
#![cfg(unix)]

use props_core::command::{Algorithm, CommandBuilder, OperationRequest};
use props_core::config::ToolConfig;
use props_core::error::ExecError;
use props_core::exec::{CommandRunner, ProcessRunner};

use common::RedactedPassword;

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn builder_with_java(home: &Path, java: &Path) -> CommandBuilder {
    let tool = ToolConfig::new(home)
        .unwrap()
        .with_java_binary(java.display().to_string());
    CommandBuilder::new(tool)
}

/// **VALUE**: Verifies the child receives each argument intact, including characters that
/// would need escaping in a shell.
///
/// **WHY THIS MATTERS**: Passwords routinely contain `"`, `$` and backslashes. With direct
/// spawning they must reach the tool byte-for-byte.
///
/// **BUG THIS CATCHES**: Would catch quotes being added to argument values, or arguments
/// being merged/split.
#[tokio::test]
#[serial]
async fn given_args_with_specials_when_run_then_child_sees_exact_argv() {
    // GIVEN: A fake java that prints its argv separated by '|'
    let dir = TempDir::new().unwrap();
    let java = write_script(dir.path(), "java", r#"printf '%s|' "$@"; echo"#);
    let builder = builder_with_java(dir.path(), &java);
    let request = OperationRequest::encrypt("hello \"world\"\nline2").with_algorithm(Algorithm::Aes);
    let command = builder.build(&request, &RedactedPassword::new(r#"p"w\$x"#));

    // WHEN: Running it
    let output = ProcessRunner::new()
        .run(&command, &CancellationToken::new())
        .await
        .unwrap();

    // THEN: Every argument arrived unchanged, and one trailing newline was stripped
    let jar = dir.path().join("secure-properties-tool.jar");
    let expected = format!(
        "-cp|{}|com.mulesoft.tools.SecurePropertiesTool|string|encrypt|AES|CBC|p\"w\\$x|hello \"world\"\nline2|",
        jar.display()
    );
    assert_eq!(output, expected);
}

/// **VALUE**: Verifies a failing tool yields its stderr verbatim with the exit code.
///
/// **WHY THIS MATTERS**: The classifier matches on the tool's exception text. If stderr is
/// lost or reformatted, every failure becomes the generic message.
///
/// **BUG THIS CATCHES**: Would catch returning stdout on failure, or wrapping stderr text.
#[tokio::test]
#[serial]
async fn given_failing_tool_when_run_then_returns_failed_with_stderr() {
    // GIVEN: A fake java that fails like a bad decrypt
    let dir = TempDir::new().unwrap();
    let java = write_script(
        dir.path(),
        "java",
        "echo 'javax.crypto.IllegalBlockSizeException: Input length must be multiple of 8 when decrypting with padded cipher' >&2; exit 3",
    );
    let command = builder_with_java(dir.path(), &java)
        .build(&OperationRequest::decrypt("abc"), &RedactedPassword::new("pw"));

    // WHEN: Running it
    let err = ProcessRunner::new()
        .run(&command, &CancellationToken::new())
        .await
        .unwrap_err();

    // THEN: Failed with exit code 3 and the exact stderr line
    assert!(matches!(err, ExecError::Failed { .. }), "{err:?}");
    assert_eq!(err.exit_code(), Some(3));
    assert_eq!(
        err.raw_message(),
        "javax.crypto.IllegalBlockSizeException: Input length must be multiple of 8 when decrypting with padded cipher"
    );
}

#[tokio::test]
#[serial]
async fn given_failing_tool_without_stderr_when_run_then_uses_stdout() {
    let dir = TempDir::new().unwrap();
    let java = write_script(dir.path(), "java", "echo 'usage: tool ...'; exit 1");
    let command = builder_with_java(dir.path(), &java)
        .build(&OperationRequest::decrypt("abc"), &RedactedPassword::new("pw"));

    let err = ProcessRunner::new()
        .run(&command, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.raw_message(), "usage: tool ...");
}

/// **VALUE**: Verifies a missing runtime is reported as a spawn failure.
///
/// **WHY THIS MATTERS**: "java not installed" is the most common first-run failure and needs
/// a message that names the program.
///
/// **BUG THIS CATCHES**: Would catch spawn errors being reported as tool failures.
#[tokio::test]
async fn given_missing_binary_when_run_then_returns_spawn_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-java");
    let command = builder_with_java(dir.path(), &missing)
        .build(&OperationRequest::encrypt("x"), &RedactedPassword::new("pw"));

    let err = ProcessRunner::new()
        .run(&command, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Spawn { .. }), "{err:?}");
    assert!(err.raw_message().contains("no-such-java"));
}

/// **VALUE**: Verifies a hung tool is stopped by the configured timeout.
///
/// **WHY THIS MATTERS**: A JVM waiting on stdin or a lock would otherwise hang the CLI.
///
/// **BUG THIS CATCHES**: Would catch the timeout not being applied to the wait.
#[tokio::test]
#[serial]
async fn given_slow_tool_when_timeout_elapses_then_returns_timeout() {
    let dir = TempDir::new().unwrap();
    let java = write_script(dir.path(), "java", "sleep 5");
    let command = builder_with_java(dir.path(), &java)
        .build(&OperationRequest::encrypt("x"), &RedactedPassword::new("pw"));

    let err = ProcessRunner::new()
        .with_timeout(Some(Duration::from_millis(200)))
        .run(&command, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
#[serial]
async fn given_cancelled_token_when_run_then_returns_cancelled() {
    let dir = TempDir::new().unwrap();
    let java = write_script(dir.path(), "java", "sleep 5");
    let command = builder_with_java(dir.path(), &java)
        .build(&OperationRequest::encrypt("x"), &RedactedPassword::new("pw"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = ProcessRunner::new().run(&command, &cancel).await.unwrap_err();

    assert!(matches!(err, ExecError::Cancelled { .. }), "{err:?}");
}

#[tokio::test]
#[serial]
async fn given_working_dir_when_run_then_child_starts_there() {
    let dir = TempDir::new().unwrap();
    let java = write_script(dir.path(), "java", "pwd");
    let command = builder_with_java(dir.path(), &java)
        .build(&OperationRequest::encrypt("x"), &RedactedPassword::new("pw"));

    let output = ProcessRunner::new()
        .with_working_dir(dir.path())
        .run(&command, &CancellationToken::new())
        .await
        .unwrap();

    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(Path::new(&output).canonicalize().unwrap(), expected);
}
