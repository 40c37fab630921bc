//! Text helpers for normalizing titles into lookup keys.

/// Collapse every run of whitespace into a single space and trim the ends.
///
/// # Examples
///
/// ```
/// use coverhound_common::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  La   La\tLand "), "La La Land");
/// ```
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join whitespace-separated words with `separator`.
///
/// # Examples
///
/// ```
/// use coverhound_common::text::join_words;
///
/// assert_eq!(join_words("The Dark Knight", "_"), "The_Dark_Knight");
/// ```
pub fn join_words(value: &str, separator: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(separator)
}

/// Remove every character that is neither alphanumeric nor whitespace, then
/// collapse whitespace.
///
/// Non-ASCII letters are kept, so Hangul or accented titles survive intact.
pub fn strip_punctuation(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    collapse_whitespace(&kept)
}

/// Lowercase and trim a value for use in a cache key.
pub fn fold_key(value: &str) -> String {
    value.trim().to_lowercase()
}
