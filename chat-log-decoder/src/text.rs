//! Text normalization helpers
//!
//! Exporters wrap names in bidirectional control characters (mostly for
//! right-to-left locales) and use no-break spaces inside timestamps. These
//! helpers strip or normalize them without touching interior characters, so
//! two names that differ only by an inner mark stay distinct users.

use std::borrow::Cow;

/// Zero-width and directional formatting characters found around names
pub fn is_directional_mark(c: char) -> bool {
    matches!(
        c,
        '\u{200E}' // LEFT-TO-RIGHT MARK
            | '\u{200F}' // RIGHT-TO-LEFT MARK
            | '\u{061C}' // ARABIC LETTER MARK
            | '\u{202A}'..='\u{202E}' // embeddings and overrides
            | '\u{2066}'..='\u{2069}' // isolates
            | '\u{FEFF}' // BOM / zero-width no-break space
    )
}

/// Trim surrounding whitespace and directional marks
pub fn trim_marks(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || is_directional_mark(c))
}

/// Replace the no-break spaces some exporters put before AM/PM
pub(crate) fn normalize_timestamp(raw: &str) -> Cow<'_, str> {
    if raw.contains(['\u{202F}', '\u{00A0}']) {
        Cow::Owned(raw.replace(['\u{202F}', '\u{00A0}'], " "))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Split "A, B and C" into its names; empty pieces are dropped
pub(crate) fn split_names(list: &str) -> Vec<&str> {
    list.split(", ")
        .flat_map(|part| part.split(" and "))
        .map(trim_marks)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Drop a trailing carriage return and a leading BOM
pub(crate) fn strip_line(line: &str) -> &str {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.strip_prefix('\u{FEFF}').unwrap_or(line)
}
