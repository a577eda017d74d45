use crate::constants::{FIELD_DELIMITER, QUOTE_CHAR};

/// Returns true if `line` can be indexed as a record.
///
/// A usable line is not blank, closes every quoted region it opens and
/// contains at least one delimiter (quoted or not). Every quote character
/// toggles the quoted state; there is no escape sequence.
pub fn is_valid_line(line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }

    let mut in_quotes = false;
    for ch in line.chars() {
        if ch == QUOTE_CHAR {
            in_quotes = !in_quotes;
        }
    }

    !in_quotes && line.contains(FIELD_DELIMITER)
}

/// Splits a line into fields on unquoted delimiters.
///
/// Quote characters are removed from anywhere inside a field and the
/// result is trimmed. The last field runs to the end of the line, so a
/// line with `n` unquoted delimiters always yields `n + 1` fields.
pub fn parse_fields(line: &str) -> Vec<String> {
    split_fields(line).map(clean_field).collect()
}

/// Nonempty `(position, value)` pairs of a line, in column order.
pub fn field_keys(line: &str) -> impl Iterator<Item = (u32, String)> + '_ {
    split_fields(line)
        .map(clean_field)
        .enumerate()
        .filter(|(_, value)| !value.is_empty())
        .map(|(position, value)| (position as u32, value))
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> + '_ {
    let mut in_quotes = false;
    line.split(move |ch: char| {
        if ch == QUOTE_CHAR {
            in_quotes = !in_quotes;
        }
        ch == FIELD_DELIMITER && !in_quotes
    })
}

fn clean_field(raw: &str) -> String {
    if raw.contains(QUOTE_CHAR) {
        raw.replace(QUOTE_CHAR, "").trim().to_string()
    } else {
        raw.trim().to_string()
    }
}
