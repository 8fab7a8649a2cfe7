//! Character name filtering
//!
//! The story service returns every capitalised token it thinks might be a
//! name. This module throws away the obvious non-names before display.

use std::collections::HashSet;

/// Common words that are never character names
pub const STOPLIST: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "were", "are", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "about", "into",
    "through", "during", "before", "after", "above", "below", "up", "down", "out", "off", "over",
    "under", "again", "further", "then", "once",
];

/// A first character that uppercasing leaves unchanged
fn starts_capitalised(first: char) -> bool {
    first.to_uppercase().eq(std::iter::once(first))
}

/// Filter raw candidate names
///
/// Drops tokens shorter than two characters, tokens whose first character
/// has a distinct uppercase form (so lowercase initials go, caseless ones
/// such as CJK or digits stay) and stoplist words, then removes
/// case-insensitive duplicates. The first spelling seen wins and order is
/// preserved.
pub fn filter_characters<S: AsRef<str>>(raw: &[S], stoplist: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();

    raw.iter()
        .map(|name| AsRef::<str>::as_ref(name))
        .filter(|name| name.chars().count() > 1)
        .filter(|name| name.chars().next().is_some_and(starts_capitalised))
        .filter(|name| {
            let lower = name.to_lowercase();
            !stoplist.iter().any(|word| word.to_lowercase() == lower)
        })
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "characters_tests.rs"]
mod characters_tests;
