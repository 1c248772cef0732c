// Unit tests for error module
// Tests error serialization (used by --json output)

use crate::error::SecurePropsError;

use common::ErrorLocation;

use props_core::classify::classify;
use props_core::error::{CoreError, ExecError, OperationError};

use std::panic::Location;

/// **VALUE**: Tests that errors serialize with a type tag.
///
/// **WHY THIS MATTERS**: Scripts using `--json` branch on the `type` field. If the tag
/// layout changes, they silently misread failures.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[derive(Serialize)]` or of the
/// `tag`/`content` attributes.
#[test]
fn given_error_when_serialized_then_has_type_and_data() {
    // GIVEN: A clipboard error
    let err = SecurePropsError::Clipboard {
        message: String::from("no display"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let value = serde_json::to_value(&err).unwrap();

    // THEN: Variant name under "type", fields under "data"
    assert_eq!(value["type"], "Clipboard");
    assert_eq!(value["data"]["message"], "no display");
    assert!(value["data"]["location"]["line"].is_number());
}

/// **VALUE**: Verifies operation failures keep the classified explanation and title.
///
/// **WHY THIS MATTERS**: The explanation is the actionable part of an error; the status
/// line shows only the title and message.
///
/// **BUG THIS CATCHES**: Would catch the raw `Display` (with type prefix and location)
/// being used as the user-facing message.
#[test]
fn given_operation_error_when_converted_then_keeps_title_and_classified_message() {
    // GIVEN: A failed decrypt with a known padding error
    let raw = "Given final block not properly padded";
    let source = CoreError::from(ExecError::Failed {
        message: raw.to_string(),
        code: Some(1),
        location: ErrorLocation::from(Location::caller()),
    });
    let operation = OperationError::Failed {
        operation: "Decryption",
        classified: classify(raw),
        location: ErrorLocation::from(Location::caller()),
        source,
    };

    // WHEN: Converting to the app error
    let err = SecurePropsError::from_operation(&operation);

    // THEN: Title and message are the user-facing ones
    assert_eq!(err.title(), "Decryption Error");
    assert_eq!(
        err.message(),
        "This may indicate an incorrect password or corrupted encrypted text.\nOriginal Error: Given final block not properly padded"
    );
}

#[test]
fn given_validation_error_when_converted_then_message_is_verbatim() {
    let operation = OperationError::Validation {
        message: "Input text is required.".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let err = SecurePropsError::from_operation(&operation);

    assert_eq!(err.title(), "Validation Error");
    assert_eq!(err.message(), "Input text is required.");
}
