//! Core data models for versefind
//!
//! A `VerseRecord` is one row of the corpus as the loader produced it. It is
//! never mutated after load; derived state lives in `candidate::Verse`.

use serde::{Deserialize, Serialize};

/// One verse of the corpus with its bibliographic fields.
/// Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Transliterated verse text, possibly spanning several lines.
    pub iast_verse: String,
    pub original_source: String,
    pub author: String,
    pub context: String,
    pub translation: String,
    pub cited_in: String,
}

impl VerseRecord {
    /// Record with only the verse text set.
    pub fn from_verse(iast_verse: impl Into<String>) -> Self {
        Self {
            iast_verse: iast_verse.into(),
            ..Self::default()
        }
    }

    /// Display lines of the verse, see [`verse_lines_from_cell`].
    pub fn verse_lines(&self) -> Vec<String> {
        verse_lines_from_cell(&self.iast_verse)
    }
}

/// Split a verse cell into display lines.
///
/// Lines are trimmed and blank lines dropped. If some lines are wrapped in
/// asterisks (`*...*`), only those lines are the verse proper and are
/// returned without the markers; the remaining lines are notes.
pub fn verse_lines_from_cell(cell: &str) -> Vec<String> {
    let raw_lines: Vec<&str> = cell
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let starred: Vec<String> = raw_lines
        .iter()
        .filter(|line| line.len() >= 2 && line.starts_with('*') && line.ends_with('*'))
        .map(|line| line[1..line.len() - 1].trim().to_string())
        .collect();

    if starred.is_empty() {
        raw_lines.into_iter().map(str::to_string).collect()
    } else {
        starred
    }
}
