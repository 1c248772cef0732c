use secure_props::commands::fetch::ensure;
use secure_props::error::SecurePropsError;

use props_core::artifact::ArtifactManager;
use props_core::config::ToolConfig;

use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JAR_ROUTE: &str = "/secure-properties-tool-j17.jar";

fn manager(server: &MockServer, home: &TempDir) -> ArtifactManager {
    let tool = ToolConfig::new(home.path())
        .unwrap()
        .with_download_url(&format!("{}{JAR_ROUTE}", server.uri()))
        .unwrap();
    ArtifactManager::new(&tool, Some(Duration::from_secs(10))).unwrap()
}

#[tokio::test]
async fn given_missing_jar_when_fetched_then_downloaded_with_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04abc".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager(&server, &home);

    let report = ensure(&manager, &CancellationToken::new()).await.unwrap();

    assert!(report.downloaded);
    assert_eq!(report.bytes, Some(7));
    assert_eq!(report.path, manager.path());
}

#[tokio::test]
async fn given_present_jar_when_fetched_then_not_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager(&server, &home);
    std::fs::write(manager.path(), b"jar").unwrap();

    let report = ensure(&manager, &CancellationToken::new()).await.unwrap();

    assert!(!report.downloaded);
    assert_eq!(report.bytes, None);
}

/// **VALUE**: Verifies download failures reach the user through the classifier.
///
/// **WHY THIS MATTERS**: Users should see the same "An error occurred..." framing with the
/// raw status for a failed fetch as for a failed operation.
///
/// **BUG THIS CATCHES**: Would catch the raw `Display` (with location) leaking to users.
#[tokio::test]
async fn given_server_error_when_fetched_then_classified_download_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAR_ROUTE))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let manager = manager(&server, &home);

    let err = ensure(&manager, &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, SecurePropsError::Operation { .. }), "{err:?}");
    assert_eq!(err.title(), "Download Error");
    assert!(err.message().starts_with("An error occurred during the operation."));
    assert!(err.message().ends_with("Status code: 503"));
    assert!(!manager.exists());
}
