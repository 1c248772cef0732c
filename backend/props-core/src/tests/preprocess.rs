use crate::preprocess::strip_wrapper;

/// **VALUE**: Verifies the wrapper is removed from a property value copied out of a
/// `.yaml`/`.properties` file.
///
/// **WHY THIS MATTERS**: Users paste `![...]` values straight from config files. If the
/// wrapper reaches the tool, decryption fails with a confusing Base64 error.
///
/// **BUG THIS CATCHES**: Would catch off-by-one slicing that leaves `!`, `[` or `]` behind.
#[test]
fn given_wrapped_text_when_strip_wrapper_called_then_returns_inner_value() {
    assert_eq!(strip_wrapper("![abc]"), "abc");
}

#[test]
fn given_plain_text_when_strip_wrapper_called_then_returns_unchanged() {
    assert_eq!(strip_wrapper("abc"), "abc");
}

/// **VALUE**: Verifies whitespace is trimmed before the wrapper check.
///
/// **WHY THIS MATTERS**: Copying a line from an editor usually brings trailing spaces or a
/// newline. Without trimming first, the `]` check fails and the wrapper survives.
///
/// **BUG THIS CATCHES**: Would catch trimming after (instead of before) the wrapper check.
#[test]
fn given_padded_wrapped_text_when_strip_wrapper_called_then_trims_then_strips() {
    assert_eq!(strip_wrapper("  ![abc]  "), "abc");
    assert_eq!(strip_wrapper("\n![abc]\r\n"), "abc");
}

/// **VALUE**: Verifies that a missing closing bracket leaves the text alone.
///
/// **WHY THIS MATTERS**: A truncated paste should reach the tool as-is so the tool's own
/// error (and our classification of it) explains the problem.
///
/// **BUG THIS CATCHES**: Would catch a prefix-only strip.
#[test]
fn given_unterminated_wrapper_when_strip_wrapper_called_then_returns_unchanged() {
    assert_eq!(strip_wrapper("![abc"), "![abc");
    assert_eq!(strip_wrapper("abc]"), "abc]");
}

/// **VALUE**: Documents that stripping is positional, not bracket matching.
///
/// **WHY THIS MATTERS**: Encrypted values never contain brackets, so the simple rule is
/// enough; this pins it so nobody "improves" it into something that behaves differently.
///
/// **BUG THIS CATCHES**: Would catch a change to balanced-bracket parsing.
#[test]
fn given_inner_brackets_when_strip_wrapper_called_then_strips_outer_only() {
    assert_eq!(strip_wrapper("![a]b]"), "a]b");
    assert_eq!(strip_wrapper("![]"), "");
    assert_eq!(strip_wrapper("!["), "![");
}
