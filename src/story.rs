//! Story text helpers
//!
//! The story itself lives in the editor widget; these functions work on its
//! joined text.

use std::path::Path;

use crate::error::CostoryError;

/// Separator placed between existing text and an accepted passage
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Word and character counts shown in the header and the PDF footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryStats {
    pub words: usize,
    pub chars: usize,
}

impl StoryStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: word_count(text),
            chars: char_count(text),
        }
    }
}

/// Whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Nothing but whitespace
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Append an accepted suggestion or completion to the story
///
/// An empty story takes the passage as-is; otherwise a blank line separates
/// the two.
pub fn append_passage(story: &str, passage: &str) -> String {
    if story.is_empty() {
        passage.to_string()
    } else {
        format!("{}{}{}", story, PASSAGE_SEPARATOR, passage)
    }
}

/// Load a story draft from disk
pub fn read_story_file(path: &Path) -> Result<String, CostoryError> {
    std::fs::read_to_string(path).map_err(|source| CostoryError::StoryFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("  The night\twas\n\ncold.  "), 4);
    }

    #[test]
    fn test_word_count_of_blank_text_is_zero() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count(" \n\t "), 0);
    }

    #[test]
    fn test_char_count_counts_characters_not_bytes() {
        assert_eq!(char_count("café"), 4);
    }

    #[test]
    fn test_stats_of_text() {
        let stats = StoryStats::of("Hello there");
        assert_eq!(stats, StoryStats { words: 2, chars: 11 });
    }

    #[test]
    fn test_append_to_empty_story_has_no_separator() {
        assert_eq!(append_passage("", "It began."), "It began.");
    }

    #[test]
    fn test_append_separates_with_blank_line() {
        assert_eq!(
            append_passage("It began.", "Then it rained."),
            "It began.\n\nThen it rained."
        );
    }

    #[test]
    fn test_read_story_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        std::fs::write(&path, "Chapter one.\n").unwrap();
        assert_eq!(read_story_file(&path).unwrap(), "Chapter one.\n");

        let missing = read_story_file(&dir.path().join("missing.txt"));
        assert!(matches!(missing, Err(CostoryError::StoryFile { .. })));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("  \n"));
        assert!(!is_blank(" x "));
    }
}
