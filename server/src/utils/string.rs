//! String utility functions

/// Parse a string that may be a JSON array or comma-separated values into a
/// list of strings.
///
/// Handles:
/// - JSON arrays: `["a", "b", "c"]`
/// - Comma-separated: `a, b, c`
/// - Malformed JSON: falls back to comma splitting
pub fn parse_string_array(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).unwrap_or_else(|_| {
            split_commas(trimmed.trim_matches(|c| c == '[' || c == ']'))
        })
    } else {
        split_commas(trimmed)
    }
}

fn split_commas(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().trim_matches('"').to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
