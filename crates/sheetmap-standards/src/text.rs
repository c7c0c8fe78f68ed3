//! Header text normalization shared by the registry and the matchers.

/// Normalizes text for comparison.
///
/// Lowercases, splits camelCase words, folds every run of non-alphanumeric
/// characters into a single space and trims the result.
pub fn normalize_text(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() {
                normalized.push(' ');
            }
            normalized.extend(ch.to_lowercase());
            prev_lower = ch.is_lowercase();
        } else {
            normalized.push(' ');
            prev_lower = false;
        }
    }
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens of already normalized text.
pub fn tokens(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

/// Normalized text with the separating spaces removed.
pub fn compact(normalized: &str) -> String {
    normalized.chars().filter(|ch| !ch.is_whitespace()).collect()
}
