//! Turns raw tool and transport errors into user-facing explanations.
//!
//! Matching is a plain, case-sensitive substring search over an ordered table;
//! the first pattern found wins. The raw message is always appended so the
//! explanation never hides diagnostic detail.

use std::fmt;

/// Separator between the explanation and the verbatim raw error.
pub const ORIGINAL_ERROR_DELIMITER: &str = "\nOriginal Error: ";

/// Explanation used when no pattern matches.
pub const GENERIC_EXPLANATION: &str =
    "An error occurred during the operation. Please check your inputs and try again.";

/// One known failure signature and its explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPattern {
    pub pattern: &'static str,
    pub message: &'static str,
}

/// Known tool failures, checked in order.
pub const ERROR_PATTERNS: &[ErrorPattern] = &[
    ErrorPattern {
        pattern: "Input length must be multiple of 8",
        message: "The encrypted text might be missing padding or is incomplete. Please ensure you're using the complete encrypted string.",
    },
    ErrorPattern {
        pattern: "Input byte array has wrong",
        message: "The text doesn't appear to be in the correct format. Please ensure you're using a properly encrypted string.",
    },
    ErrorPattern {
        pattern: "Base64",
        message: "Invalid Base64 encoding. Please ensure you're using a properly encrypted string.",
    },
    ErrorPattern {
        pattern: "Given final block not properly padded",
        message: "This may indicate an incorrect password or corrupted encrypted text.",
    },
    ErrorPattern {
        pattern: "Illegal key size",
        message: "The key size is not supported. For AES, the key must be 32 characters long.",
    },
];

/// A raw error paired with the explanation chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub matched: Option<&'static ErrorPattern>,
    pub raw: String,
}

impl ClassifiedError {
    /// The explanation without the raw suffix.
    pub fn explanation(&self) -> &'static str {
        self.matched.map_or(GENERIC_EXPLANATION, |p| p.message)
    }

    /// True when no curated pattern matched.
    pub fn is_fallback(&self) -> bool {
        self.matched.is_none()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{ORIGINAL_ERROR_DELIMITER}{}",
            self.explanation(),
            self.raw
        )
    }
}

/// Find the first pattern contained in `raw`.
pub fn classify(raw: &str) -> ClassifiedError {
    let matched = ERROR_PATTERNS.iter().find(|p| raw.contains(p.pattern));

    ClassifiedError {
        matched,
        raw: raw.to_string(),
    }
}

/// Explanation followed by the delimiter and `raw` verbatim.
pub fn explain(raw: &str) -> String {
    classify(raw).to_string()
}
