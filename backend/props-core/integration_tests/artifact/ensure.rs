use props_core::artifact::{ArtifactManager, EnsureOutcome};
use props_core::config::ToolConfig;
use props_core::error::DownloadError;

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JAR_ROUTE: &str = "/secure-properties-tool-j17.jar";
const JAR_BYTES: &[u8] = b"PK\x03\x04fake-jar-contents";

fn manager_for(server: &MockServer, home: &TempDir) -> ArtifactManager {
    let tool = ToolConfig::new(home.path())
        .unwrap()
        .with_download_url(&format!("{}{JAR_ROUTE}", server.uri()))
        .unwrap();
    ArtifactManager::new(&tool, Some(Duration::from_secs(10))).unwrap()
}

fn manager_at(addr: SocketAddr, home: &TempDir) -> ArtifactManager {
    let tool = ToolConfig::new(home.path())
        .unwrap()
        .with_download_url(&format!("http://{addr}{JAR_ROUTE}"))
        .unwrap();
    ArtifactManager::new(&tool, Some(Duration::from_secs(10))).unwrap()
}

/// How a raw connection answers after reading the request head.
enum Reply {
    /// Declares a longer body than it sends, then holds the socket open until
    /// the release channel fires (or its sender is dropped).
    Stall { sent: &'static [u8], declared: usize },
    /// Sends a complete response with `JAR_BYTES`.
    Complete,
}

fn read_request_head(stream: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// Serves one connection per entry in `replies`, in order. Stalled
/// connections close once `release` fires.
fn spawn_raw_server(replies: Vec<Reply>, release: Receiver<()>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        for reply in replies {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            read_request_head(&mut stream);
            match reply {
                Reply::Stall { sent, declared } => {
                    let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {declared}\r\n\r\n");
                    let _ = stream.write_all(head.as_bytes());
                    let _ = stream.write_all(sent);
                    let _ = stream.flush();
                    let _ = release.recv();
                }
                Reply::Complete => {
                    let head = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        JAR_BYTES.len()
                    );
                    let _ = stream.write_all(head.as_bytes());
                    let _ = stream.write_all(JAR_BYTES);
                    let _ = stream.flush();
                }
            }
        }
    });

    addr
}

/// Polls until the in-flight `.part` file shows up.
async fn wait_for_partial(manager: &ArtifactManager) {
    for _ in 0..200 {
        if manager.partial_path().exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("Download never started writing {}", manager.partial_path().display());
}

/// **VALUE**: Verifies a server error leaves no file behind.
///
/// **WHY THIS MATTERS**: `exists()` is the only check before running the tool. A file left
/// behind after a failed download would make every later run fail inside java with a
/// corrupt-JAR error instead of retrying the download.
///
/// **BUG THIS CATCHES**: Would catch creating the destination file before checking status.
#[tokio::test]
async fn given_server_error_when_ensure_called_then_no_file_left_behind() {
    // GIVEN: An endpoint returning HTTP 500
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager_for(&server, &home);

    // WHEN: Ensuring the artifact
    let result = manager.ensure(&CancellationToken::new()).await;

    // THEN: Fails with the status and nothing exists at the destination
    let err = result.expect_err("HTTP 500 must fail");
    assert_eq!(err.status().map(|s| s.0), Some(500));
    assert_eq!(
        err.raw_message(),
        "Failed to download file. Status code: 500"
    );
    assert!(!manager.exists());
    assert!(!manager.path().exists());
}

/// **VALUE**: Verifies a successful download is written byte-for-byte.
///
/// **WHY THIS MATTERS**: The JAR is executed as-is; any corruption shows up as an opaque
/// java error much later.
///
/// **BUG THIS CATCHES**: Would catch dropped or duplicated chunks while streaming.
#[tokio::test]
async fn given_missing_artifact_when_ensure_called_then_downloads_exact_bytes() {
    // GIVEN: An endpoint serving the JAR
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JAR_BYTES.to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager_for(&server, &home);
    assert!(!manager.exists());

    // WHEN: Ensuring the artifact
    let outcome = manager.ensure(&CancellationToken::new()).await.unwrap();

    // THEN: File contents match the response body
    assert_eq!(
        outcome,
        EnsureOutcome::Downloaded {
            bytes: JAR_BYTES.len() as u64
        }
    );
    assert!(outcome.downloaded());
    assert!(manager.exists());
    assert_eq!(std::fs::read(manager.path()).unwrap(), JAR_BYTES);
}

/// **VALUE**: Verifies an existing artifact is trusted and never re-fetched.
///
/// **WHY THIS MATTERS**: Every operation calls `ensure()`. Re-downloading each time would
/// make every encrypt/decrypt depend on the network.
///
/// **BUG THIS CATCHES**: Would catch a missing early return (server expects zero calls).
#[tokio::test]
async fn given_existing_artifact_when_ensure_called_then_makes_no_request() {
    // GIVEN: A JAR already on disk
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager_for(&server, &home);
    std::fs::write(manager.path(), b"old jar").unwrap();

    // WHEN: Ensuring the artifact
    let outcome = manager.ensure(&CancellationToken::new()).await.unwrap();

    // THEN: Nothing was fetched and the file is untouched
    assert_eq!(outcome, EnsureOutcome::AlreadyPresent);
    assert_eq!(std::fs::read(manager.path()).unwrap(), b"old jar");
}

/// **VALUE**: Verifies concurrent callers share one download.
///
/// **WHY THIS MATTERS**: Two downloads racing on one path interleave writes and corrupt
/// the JAR.
///
/// **BUG THIS CATCHES**: Would catch removal of the download lock or of the re-check after
/// acquiring it (server expects exactly one call).
#[tokio::test]
async fn given_concurrent_callers_when_ensure_called_then_downloads_once() {
    // GIVEN: A slow endpoint
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(JAR_BYTES.to_vec())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = Arc::new(manager_for(&server, &home));
    let cancel = CancellationToken::new();

    // WHEN: Two callers ensure at the same time
    let (first, second) = tokio::join!(manager.ensure(&cancel), manager.ensure(&cancel));

    // THEN: Exactly one of them downloaded
    let outcomes = [first.unwrap(), second.unwrap()];
    let downloads = outcomes.iter().filter(|o| o.downloaded()).count();
    assert_eq!(downloads, 1, "Outcomes: {outcomes:?}");
    assert_eq!(std::fs::read(manager.path()).unwrap(), JAR_BYTES);
}

/// **VALUE**: Verifies cancellation aborts the download without leaving a file.
///
/// **WHY THIS MATTERS**: Ctrl-C during a slow first download must not leave a partial JAR.
///
/// **BUG THIS CATCHES**: Would catch the cancellation token not being observed while
/// waiting on the network.
#[tokio::test]
async fn given_cancelled_token_when_ensure_waiting_then_returns_cancelled() {
    // GIVEN: An endpoint that takes far longer than the test
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(JAR_BYTES.to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager_for(&server, &home);
    let cancel = CancellationToken::new();

    // WHEN: Cancelling shortly after the request starts
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });
    let result = manager.ensure(&cancel).await;

    // THEN: Cancelled, no file
    assert!(matches!(result, Err(DownloadError::Cancelled { .. })));
    assert!(!manager.path().exists());
}

/// **VALUE**: Verifies a write failure is reported as such and cleaned up.
///
/// **WHY THIS MATTERS**: A read-only or broken home directory should surface a clear write
/// error, not a network one.
///
/// **BUG THIS CATCHES**: Would catch write errors being mislabeled or panicking.
#[tokio::test]
async fn given_unwritable_destination_when_ensure_called_then_returns_write_error() {
    // GIVEN: A "home" whose path is actually a regular file
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JAR_BYTES.to_vec()))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let not_a_dir = dir.path().join("home-is-a-file");
    std::fs::write(&not_a_dir, b"").unwrap();
    let tool = ToolConfig::new(&not_a_dir)
        .unwrap()
        .with_download_url(&format!("{}{JAR_ROUTE}", server.uri()))
        .unwrap();
    let manager = ArtifactManager::new(&tool, None).unwrap();

    // WHEN: Ensuring the artifact
    let result = manager.ensure(&CancellationToken::new()).await;

    // THEN: Write error, nothing exists
    assert!(matches!(result, Err(DownloadError::Write { .. })), "{result:?}");
    assert!(!manager.exists());
}

#[tokio::test]
async fn given_unreachable_endpoint_when_ensure_called_then_returns_network_error() {
    let home = TempDir::new().unwrap();
    let tool = ToolConfig::new(home.path())
        .unwrap()
        .with_download_url("http://127.0.0.1:9/secure-properties-tool-j17.jar")
        .unwrap();
    let manager = ArtifactManager::new(&tool, Some(Duration::from_secs(5))).unwrap();

    let result = manager.ensure(&CancellationToken::new()).await;

    assert!(matches!(result, Err(DownloadError::Network { .. })), "{result:?}");
    assert!(!manager.exists());
}

/// **VALUE**: Verifies a caller arriving mid-download never sees the partial JAR as present.
///
/// **WHY THIS MATTERS**: The orchestrator runs `java` right after `ensure()` succeeds. If a
/// second caller were told the artifact is ready while the first is still streaming, it
/// would execute a truncated JAR.
///
/// **BUG THIS CATCHES**: Would catch streaming straight into the destination path, which
/// lets the unlocked `exists()` fast path report a half-written file.
#[tokio::test]
async fn given_download_in_progress_when_second_caller_ensures_then_waits_for_real_artifact() {
    // GIVEN: A first connection that sends 10 of 1000 bytes and stalls, then a healthy one
    let (release, released) = mpsc::channel();
    let addr = spawn_raw_server(
        vec![
            Reply::Stall {
                sent: b"PK\x03\x04012345",
                declared: 1000,
            },
            Reply::Complete,
        ],
        released,
    );
    let home = TempDir::new().unwrap();
    let manager = Arc::new(manager_at(addr, &home));
    let cancel = CancellationToken::new();

    let first = {
        let manager = Arc::clone(&manager);
        let cancel = cancel.clone();
        tokio::spawn(async move { manager.ensure(&cancel).await })
    };
    wait_for_partial(&manager).await;

    // WHEN: A second caller ensures while the first is mid-body
    assert!(!manager.exists(), "Partial download must not count as present");
    assert!(!manager.path().exists());
    let second = {
        let manager = Arc::clone(&manager);
        let cancel = cancel.clone();
        tokio::spawn(async move { manager.ensure(&cancel).await })
    };
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!second.is_finished(), "Second caller returned before the download settled");

    // THEN: The stalled download fails, and the second caller fetches the real JAR
    drop(release);
    let first = first.await.unwrap();
    assert!(matches!(first, Err(DownloadError::Network { .. })), "{first:?}");

    let second = second.await.unwrap().unwrap();
    assert_eq!(
        second,
        EnsureOutcome::Downloaded {
            bytes: JAR_BYTES.len() as u64
        }
    );
    assert_eq!(std::fs::read(manager.path()).unwrap(), JAR_BYTES);
    assert!(!manager.partial_path().exists());
}

/// **VALUE**: Verifies a body cut short after the file was created is cleaned up.
///
/// **WHY THIS MATTERS**: A connection dropped mid-transfer is the most likely real-world
/// failure of the first download. Leaving the bytes on disk would poison every later run.
///
/// **BUG THIS CATCHES**: Would catch the cleanup guard being disarmed too early or removed.
#[tokio::test]
async fn given_truncated_body_when_ensure_called_then_network_error_and_no_file() {
    // GIVEN: A server declaring 1000 bytes that closes after 10
    let (release, released) = mpsc::channel();
    let addr = spawn_raw_server(
        vec![Reply::Stall {
            sent: b"PK\x03\x04012345",
            declared: 1000,
        }],
        released,
    );
    drop(release);
    let home = TempDir::new().unwrap();
    let manager = manager_at(addr, &home);

    // WHEN: Ensuring the artifact
    let result = manager.ensure(&CancellationToken::new()).await;

    // THEN: Network error, neither the JAR nor the partial file remains
    assert!(matches!(result, Err(DownloadError::Network { .. })), "{result:?}");
    assert!(!manager.exists());
    assert!(!manager.partial_path().exists());
}

/// **VALUE**: Verifies cancelling while the body is streaming removes what was written.
///
/// **WHY THIS MATTERS**: Ctrl-C during a slow first download usually lands mid-body, after
/// bytes are already on disk.
///
/// **BUG THIS CATCHES**: Would catch the cancellation branch of the stream loop skipping
/// cleanup.
#[tokio::test]
async fn given_cancel_mid_body_when_ensure_streaming_then_cancelled_and_no_file() {
    // GIVEN: A download stalled after its first bytes
    let (_release, released) = mpsc::channel();
    let addr = spawn_raw_server(
        vec![Reply::Stall {
            sent: b"PK\x03\x04012345",
            declared: 1000,
        }],
        released,
    );
    let home = TempDir::new().unwrap();
    let manager = Arc::new(manager_at(addr, &home));
    let cancel = CancellationToken::new();
    let task = {
        let manager = Arc::clone(&manager);
        let cancel = cancel.clone();
        tokio::spawn(async move { manager.ensure(&cancel).await })
    };
    wait_for_partial(&manager).await;

    // WHEN: Cancelling
    cancel.cancel();
    let result = task.await.unwrap();

    // THEN: Cancelled and nothing left on disk
    assert!(matches!(result, Err(DownloadError::Cancelled { .. })), "{result:?}");
    assert!(!manager.exists());
    assert!(!manager.partial_path().exists());
}
