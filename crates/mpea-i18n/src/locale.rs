//! Locale allow-list checks.

/// Exact, case-insensitive membership in the allow-list.
pub fn is_supported_locale(locale: &str, allowed: &[String]) -> bool {
    let wanted = locale.trim().to_lowercase();
    !wanted.is_empty() && allowed.iter().any(|l| l.to_lowercase() == wanted)
}

/// Map a requested locale onto the allow-list.
///
/// An exact match wins, then the first allowed locale that prefixes the request
/// (`en-US` -> `en`), then the first allowed locale. Returns an empty string
/// only when the allow-list itself is empty.
pub fn normalize_locale(requested: &str, allowed: &[String]) -> String {
    let wanted = requested.trim().to_lowercase();

    if let Some(exact) = allowed.iter().find(|l| l.to_lowercase() == wanted) {
        return exact.clone();
    }
    if !wanted.is_empty()
        && let Some(prefix) = allowed
            .iter()
            .find(|l| !l.is_empty() && wanted.starts_with(&l.to_lowercase()))
    {
        return prefix.clone();
    }

    allowed.first().cloned().unwrap_or_default()
}
