//! Highlight flattening.

use std::collections::HashMap;

/// Joins highlight snippets (space, horizontal ellipsis, space).
pub const HIGHLIGHT_SEPARATOR: &str = " \u{2026} ";

/// At most this many snippets are kept per field.
pub const MAX_HIGHLIGHTS: usize = 3;

/// Suffix of the injected highlight keys.
pub const HIGHLIGHT_SUFFIX: &str = "_highlight";

/// The parsed highlight field list.
///
/// The list is split on `,` without trimming. An empty list therefore
/// yields a single empty field name, and every result gets a `_highlight`
/// key with an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightFields(Vec<String>);

impl HighlightFields {
    /// Parses a comma separated list.
    pub fn parse(list: &str) -> Self {
        Self(list.split(',').map(str::to_string).collect())
    }

    /// Iterates over field names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the result key for a field.
    pub fn key(field: &str) -> String {
        format!("{}{}", field, HIGHLIGHT_SUFFIX)
    }
}

/// Flattens a hit's snippets for one field.
pub fn format_highlight(highlight: Option<&HashMap<String, Vec<String>>>, field: &str) -> String {
    highlight
        .and_then(|h| h.get(field))
        .map(|snippets| {
            snippets
                .iter()
                .take(MAX_HIGHLIGHTS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(HIGHLIGHT_SEPARATOR)
        })
        .unwrap_or_default()
}
