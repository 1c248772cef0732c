//! Input clean-up applied before decryption.

const WRAPPER_PREFIX: &str = "![";
const WRAPPER_SUFFIX: &str = "]";

/// Strip the `![...]` wrapper used for encrypted property values.
///
/// The text is trimmed first. Only an exact `![` prefix together with a `]`
/// as the final character is removed; brackets are not matched, so
/// `![a]b]` becomes `a]b`. Anything else comes back trimmed but otherwise
/// unchanged.
pub fn strip_wrapper(text: &str) -> String {
    let trimmed = text.trim();

    trimmed
        .strip_prefix(WRAPPER_PREFIX)
        .and_then(|rest| rest.strip_suffix(WRAPPER_SUFFIX))
        .unwrap_or(trimmed)
        .to_string()
}
