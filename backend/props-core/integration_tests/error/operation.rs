use props_core::classify::{ORIGINAL_ERROR_DELIMITER, classify};
use props_core::error::{CoreError, ExecError, OperationError};

use common::ErrorLocation;

use std::error::Error;
use std::panic::Location;

fn failed_decrypt(raw: &str) -> OperationError {
    let source = CoreError::from(ExecError::Failed {
        message: raw.to_string(),
        code: Some(1),
        location: ErrorLocation::from(Location::caller()),
    });
    OperationError::Failed {
        operation: "Decryption",
        classified: classify(raw),
        location: ErrorLocation::from(Location::caller()),
        source,
    }
}

/// **VALUE**: Verifies a failed operation renders the classified message under its
/// operation title.
///
/// **WHY THIS MATTERS**: The title is the notification headline and the classified text is
/// the body. Both are built from this one error.
///
/// **BUG THIS CATCHES**: Would catch the raw error being shown instead of the explanation,
/// or the explanation losing the raw suffix.
#[test]
fn given_failed_operation_when_formatted_then_shows_title_and_classified_text() {
    // GIVEN: A decrypt that failed with a known padding error
    let raw = "javax.crypto.IllegalBlockSizeException: Input length must be multiple of 8";
    let err = failed_decrypt(raw);

    // WHEN: Rendering for the user
    let title = err.title();
    let message = err.user_message();

    // THEN: Title names the operation and the message ends with the raw error
    assert_eq!(title, "Decryption Error");
    assert!(message.starts_with("The encrypted text might be missing padding"));
    assert!(message.ends_with(&format!("{ORIGINAL_ERROR_DELIMITER}{raw}")));
    assert!(err.to_string().starts_with("Decryption Error: "));
    assert!(err.to_string().contains("operation.rs"));
}

#[test]
fn given_failed_operation_when_inspected_then_source_is_the_core_error() {
    let err = failed_decrypt("boom");

    let source = err.source().expect("failed operation must have a source");

    assert!(source.to_string().starts_with("Execution Error: boom"));
}

#[test]
#[track_caller]
fn given_validation_error_when_rendered_then_message_is_verbatim() {
    let err = OperationError::Validation {
        message: "Input text is required.".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    assert_eq!(err.user_message(), "Input text is required.");
    assert_eq!(err.title(), "Validation Error");
    assert!(err.source().is_none());
}

#[test]
#[track_caller]
fn given_password_not_set_when_rendered_then_has_own_title() {
    let err = OperationError::PasswordNotSet {
        message: "No password provided.".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    assert_eq!(err.title(), "Password Not Set");
    assert!(err.to_string().starts_with("Password Not Set Error: "));
}
