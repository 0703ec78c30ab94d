//! Utility functions shared across crates

/// Truncate a string to at most `max_chars` characters.
///
/// # Examples
///
/// ```
/// use mpea_common::truncate_chars;
///
/// assert_eq!(truncate_chars("Mozilla/5.0", 7), "Mozilla");
/// assert_eq!(truncate_chars("短文本", 10), "短文本");
/// ```
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// Collapse blank optional strings to `None`.
///
/// Form fields arrive as empty strings when left unfilled; storage keeps them as NULL.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
