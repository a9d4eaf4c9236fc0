//! Identifier sanitization shared by the asset and scene layers.

/// Turn a free-text name into a stable script identifier.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single underscore, trims edge underscores, and prefixes an underscore
/// when the result would start with a digit. The same input always yields
/// the same identifier, so asset filenames and script references agree.
///
/// # Examples
///
/// ```
/// use vignette_core::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Detective Chen"), "detective_chen");
/// assert_eq!(sanitize_identifier("2Bad Name!!"), "_2bad_name");
/// assert_eq!(sanitize_identifier("!!!"), "unknown");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            result.push(ch);
            last_was_underscore = false;
        } else if !last_was_underscore && !result.is_empty() {
            result.push('_');
            last_was_underscore = true;
        }
    }

    let trimmed = result.trim_matches('_');

    if trimmed.is_empty() {
        return "unknown".to_string();
    }

    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}
