//! Text normalization for column headers and cells.

const QUOTES: [char; 2] = ['"', '\''];

/// Trim a column header and remove every quote character from it.
pub fn clean_column_name(raw: &str) -> String {
    raw.trim().chars().filter(|c| !QUOTES.contains(c)).collect()
}

/// Normalize a single cell.
///
/// Surrounding whitespace and quotes are stripped. Cells left empty, such as
/// `""` or a lone `'`, are missing.
pub fn clean_cell(raw: &str) -> Option<String> {
    let stripped = raw
        .trim()
        .trim_matches(|c: char| c == ' ' || QUOTES.contains(&c));

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Peel matching layers of surrounding quotes and whitespace.
///
/// `"' Foo '"` becomes `Foo`. An empty result is reported as missing.
pub fn strip_nested_quotes(raw: &str) -> Option<String> {
    let mut value = raw.trim();
    while value.len() >= 2 && value.starts_with(QUOTES) && value.ends_with(QUOTES) {
        value = value[1..value.len() - 1].trim();
    }

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decode a raw field, falling back to ISO-8859-1 when it is not valid UTF-8.
pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
