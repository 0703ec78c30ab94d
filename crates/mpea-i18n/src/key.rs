//! Dotted translation keys and their namespaces.

use mpea_common::{CmsError, ROOT_NAMESPACE};

pub const FULL_KEY_REQUIRED: &str = "fullKey is required";

/// Strip every whitespace character from a dotted key.
///
/// ```
/// use mpea_i18n::sanitize_full_key;
///
/// assert_eq!(sanitize_full_key("  home. hero .title "), "home.hero.title");
/// ```
pub fn sanitize_full_key(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Sanitize a key and reject it if nothing is left.
pub fn require_full_key(raw: &str) -> anyhow::Result<String> {
    let key = sanitize_full_key(raw);
    if key.is_empty() {
        return Err(CmsError::IllegalArgument(FULL_KEY_REQUIRED.to_string()).into());
    }
    Ok(key)
}

/// The first dot-segment of a sanitized key, or `root` when it is empty.
pub fn derive_namespace(full_key: &str) -> String {
    full_key
        .split('.')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(ROOT_NAMESPACE)
        .to_string()
}
