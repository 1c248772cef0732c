use crate::classify::{
    ERROR_PATTERNS, GENERIC_EXPLANATION, ORIGINAL_ERROR_DELIMITER, classify, explain,
};

/// **VALUE**: Verifies a known tool failure gets its curated explanation plus the raw text.
///
/// **WHY THIS MATTERS**: "Input length must be multiple of 8" is the most common decryption
/// failure (truncated paste). Users need the hint; support needs the raw text.
///
/// **BUG THIS CATCHES**: Would catch the explanation replacing, rather than prefixing, the
/// raw error.
#[test]
fn given_padding_error_when_explained_then_starts_with_hint_and_ends_with_raw() {
    // GIVEN: A raw padding error
    let raw = "Input length must be multiple of 8 extra";

    // WHEN: Explaining it
    let explained = explain(raw);

    // THEN: Hint first, raw text last
    assert!(explained.starts_with("The encrypted text might be missing padding"));
    assert!(explained.ends_with(raw));
    assert!(explained.contains(ORIGINAL_ERROR_DELIMITER));
}

/// **VALUE**: Verifies unmatched errors fall back to the generic template.
///
/// **WHY THIS MATTERS**: Unknown failures (java missing, network down) must still show the
/// raw message; otherwise users get advice with no detail to act on.
///
/// **BUG THIS CATCHES**: Would catch the fallback dropping the raw suffix.
#[test]
fn given_unknown_error_when_explained_then_returns_generic_with_raw() {
    let explained = explain("totally unknown error");

    assert_eq!(
        explained,
        format!("{GENERIC_EXPLANATION}{ORIGINAL_ERROR_DELIMITER}totally unknown error")
    );
    assert!(classify("totally unknown error").is_fallback());
}

/// **VALUE**: Enumerates the whole table: every pattern classifies to its own message.
///
/// **WHY THIS MATTERS**: The table is ordered and first-match-wins. A new entry whose
/// substring appears in an earlier one would shadow it silently.
///
/// **BUG THIS CATCHES**: Would catch shadowed or duplicated patterns.
#[test]
fn given_each_pattern_when_classified_then_matches_itself() {
    for pattern in ERROR_PATTERNS {
        // GIVEN: A raw message that contains only this pattern
        let raw = format!("javax.crypto.BadPaddingException: {}", pattern.pattern);

        // WHEN: Classifying
        let classified = classify(&raw);

        // THEN: The same entry wins
        assert_eq!(
            classified.matched,
            Some(pattern),
            "Pattern '{}' was shadowed",
            pattern.pattern
        );
        assert_eq!(classified.to_string(), explain(&raw));
    }
}

/// **VALUE**: Verifies first-match-wins when a message contains two patterns.
///
/// **WHY THIS MATTERS**: Java stack traces often mention Base64 alongside a more specific
/// cause. The more specific (earlier) entry must win.
///
/// **BUG THIS CATCHES**: Would catch iterating the table in reverse or picking the last match.
#[test]
fn given_message_with_two_patterns_when_classified_then_first_in_table_wins() {
    let raw = "Base64 decode: Input byte array has wrong 4-byte ending unit";

    let classified = classify(raw);

    assert_eq!(
        classified.matched.map(|p| p.pattern),
        Some("Input byte array has wrong")
    );
}

#[test]
fn given_lowercase_pattern_when_classified_then_does_not_match() {
    // Matching is case-sensitive
    assert!(classify("illegal key size").is_fallback());
    assert!(!classify("java.security.InvalidKeyException: Illegal key size").is_fallback());
}
