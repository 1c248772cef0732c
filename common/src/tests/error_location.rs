use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` correctly captures file, line, and column.
///
/// **WHY THIS MATTERS**: ErrorLocation is the foundation of the error tracking system.
/// Download and exec failures are reported from several call sites; without accurate
/// locations the logs cannot tell them apart.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `Location::caller()` stops being propagated correctly
/// - File path extraction breaks
/// - Line/column capture fails
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: The line the location is captured on
    let expected_line = line!() + 3;

    // WHEN: Creating ErrorLocation from caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, expected_line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies that ErrorLocation Display formatting produces the expected format.
///
/// **WHY THIS MATTERS**: Every error enum in the workspace appends `{location}` to its
/// message. If the format breaks, every user-facing error changes shape.
///
/// **BUG THIS CATCHES**: Would catch if the Display implementation drops the brackets or
/// loses one of the file/line/column components.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Should produce "[file:line:column]" format
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(
        formatted.contains("error_location.rs"),
        "Should include filename"
    );
    assert!(
        formatted.contains(&format!(":{}:{}]", location.line, location.column)),
        "Should include line and column"
    );
}

/// **VALUE**: Verifies that `#[track_caller]` helpers report their caller, not themselves.
///
/// **WHY THIS MATTERS**: The core crate builds errors inside small `#[track_caller]`
/// helpers. If propagation breaks, every error points at the helper body.
///
/// **BUG THIS CATCHES**: Would catch a helper that forgets `#[track_caller]` while still
/// relying on `Location::caller()`.
#[test]
fn given_track_caller_helper_when_called_then_reports_call_site() {
    #[track_caller]
    fn capture() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    // GIVEN: The line of the call site
    let expected_line = line!() + 3;

    // WHEN: Capturing through the helper
    let location = capture();

    // THEN: Should report this line
    assert_eq!(location.line, expected_line);
}
