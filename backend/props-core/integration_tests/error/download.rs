use props_core::error::{CoreError, DownloadError, ExecError};

use common::{ErrorLocation, HttpStatusCode};

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;
use std::path::PathBuf;

/// **VALUE**: Verifies `DownloadError::Http` carries type, message, location and status.
///
/// **WHY THIS MATTERS**: A rejected download is usually a moved URL or a proxy. The status
/// code and the line that raised it are what tell those apart.
///
/// **BUG THIS CATCHES**: Would catch the location being dropped from Display, or the status
/// accessor returning the wrong variant's data.
#[test]
#[track_caller]
fn given_http_error_when_formatted_then_includes_type_message_and_location() {
    // GIVEN: An HTTP 404 download error
    let err = DownloadError::Http {
        message: "Failed to download file. Status code: 404".to_string(),
        status: HttpStatusCode(404),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Formatting it
    let text = err.to_string();

    // THEN: Type prefix, message and file location are present; raw message has neither
    assert!(text.starts_with("HTTP Error: "));
    assert!(text.contains("Status code: 404"));
    assert!(text.contains("download.rs"));
    assert_eq!(err.raw_message(), "Failed to download file. Status code: 404");
    assert_eq!(err.status(), Some(HttpStatusCode(404)));
}

/// **VALUE**: Verifies write failures keep the io::Error as their source.
///
/// **WHY THIS MATTERS**: "Permission denied" versus "No space left" is only visible through
/// the source chain.
///
/// **BUG THIS CATCHES**: Would catch `#[source]` being removed from the Write variant.
#[test]
#[track_caller]
fn given_write_error_when_inspected_then_source_chain_is_preserved() {
    let err = DownloadError::Write {
        message: "Failed to create artifact file: permission denied".to_string(),
        path: PathBuf::from("/home/user/secure-properties-tool.jar"),
        location: ErrorLocation::from(Location::caller()),
        source: IoError::new(ErrorKind::PermissionDenied, "permission denied"),
    };

    let text = err.to_string();
    assert!(text.starts_with("Write Error: "));
    assert!(text.contains("secure-properties-tool.jar"));
    assert!(err.status().is_none());

    let source = err.source().expect("write error must have a source");
    assert_eq!(source.to_string(), "permission denied");
}

#[test]
#[track_caller]
fn given_core_error_when_wrapping_then_display_and_raw_message_pass_through() {
    let exec = ExecError::Failed {
        message: "Illegal key size".to_string(),
        code: Some(1),
        location: ErrorLocation::from(Location::caller()),
    };
    let direct = exec.to_string();

    let core = CoreError::from(exec);

    assert_eq!(core.to_string(), direct);
    assert_eq!(core.raw_message(), "Illegal key size");
}
