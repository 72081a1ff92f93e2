//! Corpus entries with memoized derived state.
//!
//! Module isolation ensures no code outside this module can mutate the record
//! after construction, so the `OnceLock` caches can never go stale.

use crate::labels;
use crate::models::VerseRecord;
use crate::normalize::{normalize, normalize_with_positions, NormalizedText};
use std::sync::OnceLock;

/// A verse of the corpus plus lazily computed comparison forms.
/// `normalized()` feeds ranking; `lines()` and `display_text()` feed
/// highlighting. Each is computed on first access and cached.
#[derive(Debug)]
pub struct Verse {
    record: VerseRecord,
    normalized: OnceLock<Vec<char>>,
    lines: OnceLock<Vec<String>>,
    display_text: OnceLock<NormalizedText>,
}

impl Verse {
    pub fn new(record: VerseRecord) -> Self {
        Self {
            record,
            normalized: OnceLock::new(),
            lines: OnceLock::new(),
            display_text: OnceLock::new(),
        }
    }

    pub fn record(&self) -> &VerseRecord {
        &self.record
    }

    /// Normalized characters of the whole `iast_verse` cell.
    pub fn normalized(&self) -> &[char] {
        self.normalized
            .get_or_init(|| normalize(&self.record.iast_verse).chars().collect())
    }

    /// Display lines. A verse with no extractable lines is shown as its raw
    /// text on a single line.
    pub fn lines(&self) -> &[String] {
        self.lines.get_or_init(|| {
            let lines = self.record.verse_lines();
            if lines.is_empty() && !self.record.iast_verse.is_empty() {
                vec![self.record.iast_verse.clone()]
            } else {
                lines
            }
        })
    }

    /// Normalized display lines with their position table.
    pub fn display_text(&self) -> &NormalizedText {
        self.display_text
            .get_or_init(|| normalize_with_positions(self.lines()))
    }
}

impl Clone for Verse {
    fn clone(&self) -> Self {
        Self::new(self.record.clone())
    }
}

impl From<VerseRecord> for Verse {
    fn from(record: VerseRecord) -> Self {
        Self::new(record)
    }
}

/// Ordered, read-only verse collection. Order is significant: it breaks
/// ranking ties.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    verses: Vec<Verse>,
}

impl Corpus {
    pub fn from_records(records: impl IntoIterator<Item = VerseRecord>) -> Self {
        Self {
            verses: records.into_iter().map(Verse::new).collect(),
        }
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn get(&self, index: usize) -> Option<&Verse> {
        self.verses.get(index)
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &VerseRecord> {
        self.verses.iter().map(Verse::record)
    }

    /// Sorted distinct "cited in" sources of the corpus.
    pub fn cited_sources(&self) -> Vec<String> {
        labels::cited_sources(self.records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_caches_are_consistent() {
        let verse = Verse::new(VerseRecord::from_verse(
            "*sarva-dharmān parityajya*\ngloss\n*māṁ ekaṁ śaraṇaṁ vraja*",
        ));
        assert_eq!(verse.lines(), ["sarva-dharmān parityajya", "māṁ ekaṁ śaraṇaṁ vraja"]);
        assert_eq!(verse.display_text().as_str(), "sarvadharmanparityajyamamekamsaranamvraja");
        // whole cell includes the gloss line
        let whole: String = verse.normalized().iter().collect();
        assert_eq!(whole, "sarvadharmanparityajyaglossmamekamsaranamvraja");
        // second access hits the cache
        assert!(std::ptr::eq(verse.display_text(), verse.display_text()));
    }

    #[test]
    fn test_verse_with_only_blank_lines() {
        let verse = Verse::new(VerseRecord::from_verse("  \n "));
        assert_eq!(verse.lines(), ["  \n "]);
        assert!(verse.display_text().is_empty());
        assert!(verse.normalized().is_empty());
    }

    #[test]
    fn test_corpus_preserves_order() {
        let corpus = Corpus::from_records(["a", "b", "c"].map(VerseRecord::from_verse));
        assert_eq!(corpus.len(), 3);
        let texts: Vec<&str> = corpus.records().map(|r| r.iast_verse.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert_eq!(corpus.get(1).map(|v| v.record().iast_verse.as_str()), Some("b"));
        assert!(corpus.get(3).is_none());
    }
}
