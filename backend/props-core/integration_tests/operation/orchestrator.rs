use props_core::artifact::ArtifactManager;
use props_core::command::{Algorithm, CommandBuilder, Mode, OperationKind, OperationRequest, ShellCommand};
use props_core::config::{Preferences, ToolConfig};
use props_core::error::{ExecError, OperationError};
use props_core::exec::CommandRunner;
use props_core::operation::{Orchestrator, PASSWORD_NOT_SET_MESSAGE, REQUIRED_INPUT_MESSAGE};
use props_core::ARTIFACT_FILE_NAME;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JAR_ROUTE: &str = "/secure-properties-tool-j17.jar";

/// Records every tool line it is asked to run and replies with a canned result.
struct FakeRunner {
    calls: Arc<Mutex<Vec<String>>>,
    reply: Result<String, String>,
}

impl FakeRunner {
    fn ok(output: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let runner = Self {
            calls: Arc::clone(&calls),
            reply: Ok(output.to_string()),
        };
        (runner, calls)
    }

    fn failing(stderr: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let runner = Self {
            calls: Arc::clone(&calls),
            reply: Err(stderr.to_string()),
        };
        (runner, calls)
    }
}

impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        command: &ShellCommand,
        _cancel: &CancellationToken,
    ) -> Result<String, ExecError> {
        self.calls.lock().unwrap().push(command.tool_line());
        match &self.reply {
            Ok(output) => Ok(output.clone()),
            Err(message) => Err(ExecError::Failed {
                message: message.clone(),
                code: Some(1),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Home dir with the JAR already in place, so no download happens.
fn home_with_jar() -> TempDir {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(ARTIFACT_FILE_NAME), b"jar").unwrap();
    home
}

fn orchestrator(
    home: &TempDir,
    download_url: Option<String>,
    runner: FakeRunner,
    preferences: Preferences,
) -> Orchestrator<FakeRunner> {
    let mut tool = ToolConfig::new(home.path()).unwrap();
    if let Some(url) = download_url {
        tool = tool.with_download_url(&url).unwrap();
    }
    let artifacts = Arc::new(ArtifactManager::new(&tool, Some(Duration::from_secs(10))).unwrap());
    Orchestrator::new(artifacts, CommandBuilder::new(tool), runner, preferences)
}

fn default_password(password: &str) -> Preferences {
    Preferences {
        default_password: Some(password.to_string()),
    }
}

/// **VALUE**: Verifies a plain encrypt produces the exact tool argument line and returns the
/// tool's output.
///
/// **WHY THIS MATTERS**: The tool is positional. A swapped or missing argument silently
/// encrypts with the wrong settings.
///
/// **BUG THIS CATCHES**: Would catch argument reordering or a stray random-IV flag.
#[tokio::test]
async fn given_encrypt_request_when_executed_then_runs_expected_tool_line() {
    // GIVEN: An AES/CBC encrypt with an explicit password
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("cipher==");
    let orchestrator = orchestrator(&home, None, runner, Preferences::default());
    let request = OperationRequest::encrypt("hello")
        .with_password("pw")
        .with_algorithm(Algorithm::Aes)
        .with_mode(Mode::Cbc);

    // WHEN: Executing
    let outcome = orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    // THEN: One call with the contract line, output passed through
    assert_eq!(outcome.kind, OperationKind::Encrypt);
    assert_eq!(outcome.output, "cipher==");
    assert!(!outcome.artifact_downloaded);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string encrypt AES CBC "pw" "hello""#.to_string()]
    );
}

#[tokio::test]
async fn given_encrypt_with_random_iv_when_executed_then_true_precedes_password() {
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("x");
    let orchestrator = orchestrator(&home, None, runner, Preferences::default());
    let request = OperationRequest::encrypt("hello")
        .with_password("pw")
        .with_random_iv(true);

    orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string encrypt Blowfish CBC true "pw" "hello""#.to_string()]
    );
}

/// **VALUE**: Verifies decrypt strips the `![...]` wrapper before calling the tool.
///
/// **WHY THIS MATTERS**: Users paste values straight from property files, wrapper included.
/// The tool rejects the wrapped form as invalid Base64.
///
/// **BUG THIS CATCHES**: Would catch stripping being skipped for decrypt.
#[tokio::test]
async fn given_wrapped_ciphertext_when_decrypted_then_wrapper_is_stripped() {
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("plain");
    let orchestrator = orchestrator(&home, None, runner, Preferences::default());
    let request = OperationRequest::decrypt("  ![XYZ123]\n").with_password("pw");

    let outcome = orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.output, "plain");
    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string decrypt Blowfish CBC "pw" "XYZ123""#.to_string()]
    );
}

#[tokio::test]
async fn given_strip_disabled_when_decrypted_then_input_is_untouched() {
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("plain");
    let orchestrator = orchestrator(&home, None, runner, Preferences::default());
    let request = OperationRequest::decrypt("![XYZ123]")
        .with_password("pw")
        .with_strip_wrapper(false);

    orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string decrypt Blowfish CBC "pw" "![XYZ123]""#.to_string()]
    );
}

/// **VALUE**: Verifies empty input fails before any download or execution.
///
/// **WHY THIS MATTERS**: A first run with an accidental empty submit must not trigger a
/// multi-megabyte download.
///
/// **BUG THIS CATCHES**: Would catch validation running after `ensure`.
#[tokio::test]
async fn given_empty_input_when_executed_then_validation_error_and_nothing_runs() {
    // GIVEN: No JAR on disk, and a download endpoint that must not be hit
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let (runner, calls) = FakeRunner::ok("unused");
    let orchestrator = orchestrator(
        &home,
        Some(format!("{}{JAR_ROUTE}", server.uri())),
        runner,
        default_password("pw"),
    );

    // WHEN: Executing with empty input
    let err = orchestrator
        .execute(OperationRequest::encrypt(""), &CancellationToken::new())
        .await
        .unwrap_err();

    // THEN: Validation error with the fixed message, no runner call, no file
    assert!(matches!(err, OperationError::Validation { .. }), "{err:?}");
    assert_eq!(err.user_message(), REQUIRED_INPUT_MESSAGE);
    assert_eq!(err.title(), "Validation Error");
    assert!(calls.lock().unwrap().is_empty());
    assert!(!orchestrator.artifacts().exists());
}

#[tokio::test]
async fn given_no_password_and_no_default_when_executed_then_password_not_set() {
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("unused");
    let orchestrator = orchestrator(&home, None, runner, Preferences::default());

    let err = orchestrator
        .execute(OperationRequest::encrypt("hello"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, OperationError::PasswordNotSet { .. }), "{err:?}");
    assert_eq!(err.user_message(), PASSWORD_NOT_SET_MESSAGE);
    assert!(calls.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies an empty explicit password falls back to the stored default.
///
/// **WHY THIS MATTERS**: An empty password field means "use my default", not "encrypt with
/// an empty key".
///
/// **BUG THIS CATCHES**: Would catch `Some("")` being treated as a real password.
#[tokio::test]
async fn given_empty_password_with_default_when_executed_then_default_is_used() {
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("x");
    let orchestrator = orchestrator(&home, None, runner, default_password("stored"));
    let request = OperationRequest::encrypt("hello").with_password("");

    orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string encrypt Blowfish CBC "stored" "hello""#.to_string()]
    );
}

#[tokio::test]
async fn given_explicit_password_and_default_when_executed_then_explicit_wins() {
    let home = home_with_jar();
    let (runner, calls) = FakeRunner::ok("x");
    let orchestrator = orchestrator(&home, None, runner, default_password("stored"));
    let request = OperationRequest::encrypt("hello").with_password("explicit");

    orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![r#"string encrypt Blowfish CBC "explicit" "hello""#.to_string()]
    );
}

/// **VALUE**: Verifies tool failures reach the user classified, with the raw text kept.
///
/// **WHY THIS MATTERS**: The explanation tells users what to fix; the raw text is what
/// support needs.
///
/// **BUG THIS CATCHES**: Would catch the raw stderr being dropped or the wrong title.
#[tokio::test]
async fn given_tool_failure_when_executed_then_error_is_classified() {
    let home = home_with_jar();
    let raw = "javax.crypto.BadPaddingException: Given final block not properly padded";
    let (runner, _calls) = FakeRunner::failing(raw);
    let orchestrator = orchestrator(&home, None, runner, Preferences::default());
    let request = OperationRequest::decrypt("abc").with_password("pw");

    let err = orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.title(), "Decryption Error");
    assert_eq!(
        err.user_message(),
        format!(
            "This may indicate an incorrect password or corrupted encrypted text.\nOriginal Error: {raw}"
        )
    );
    match err {
        OperationError::Failed { classified, .. } => assert!(!classified.is_fallback()),
        other => panic!("expected Failed, got {other:?}"),
    }
}

/// **VALUE**: Verifies a failed download aborts the call before the tool runs.
///
/// **WHY THIS MATTERS**: Running java against a missing JAR yields a confusing
/// ClassNotFound error instead of the real cause.
///
/// **BUG THIS CATCHES**: Would catch download errors being logged and ignored.
#[tokio::test]
async fn given_download_failure_when_executed_then_generic_error_and_tool_not_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let (runner, calls) = FakeRunner::ok("unused");
    let orchestrator = orchestrator(
        &home,
        Some(format!("{}{JAR_ROUTE}", server.uri())),
        runner,
        Preferences::default(),
    );
    let request = OperationRequest::encrypt("hello").with_password("pw");

    let err = orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.title(), "Encryption Error");
    let message = err.user_message();
    assert!(message.starts_with("An error occurred during the operation."));
    assert!(message.ends_with("Original Error: Failed to download file. Status code: 500"));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn given_missing_jar_when_executed_then_downloads_then_runs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04jar".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let (runner, calls) = FakeRunner::ok("cipher");
    let orchestrator = orchestrator(
        &home,
        Some(format!("{}{JAR_ROUTE}", server.uri())),
        runner,
        Preferences::default(),
    );
    let request = OperationRequest::encrypt("hello").with_password("pw");

    let outcome = orchestrator
        .execute(request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.artifact_downloaded);
    assert!(orchestrator.artifacts().exists());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn given_request_when_planned_then_returns_command_without_running() {
    let home = TempDir::new().unwrap();
    let (runner, calls) = FakeRunner::ok("unused");
    let orchestrator = orchestrator(&home, None, runner, default_password("stored"));

    let command = orchestrator
        .plan(OperationRequest::decrypt("![abc]"))
        .unwrap();

    assert_eq!(command.tool_line(), r#"string decrypt Blowfish CBC "stored" "abc""#);
    assert!(!command.to_string().contains("stored"));
    assert!(calls.lock().unwrap().is_empty());
    assert!(!orchestrator.artifacts().exists());
}
