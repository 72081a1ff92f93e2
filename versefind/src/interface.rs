//! versefind public interface
//!
//! Types handed to renderers and front ends. It acts as the source of truth
//! for shared types.

use crate::labels::CitedItem;
use crate::matcher::MatchKind;
use crate::models::VerseRecord;
use serde::Serialize;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A stretch of a line that is entirely highlighted or entirely plain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightRun {
    pub text: String,
    pub highlighted: bool,
}

/// One original verse line split into runs.
///
/// # Display Contract
///
/// Concatenating `runs` reproduces the original line exactly: no
/// whitespace normalization, no escaping, no truncation. Escaping for HTML or
/// terminal output is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HighlightedLine {
    pub runs: Vec<HighlightRun>,
}

impl HighlightedLine {
    /// A line with nothing highlighted.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![HighlightRun { text: text.into(), highlighted: false }],
        }
    }

    /// The original line.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn has_highlight(&self) -> bool {
        self.runs.iter().any(|r| r.highlighted)
    }
}

/// A surfaced search hit with display-ready lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerseMatch {
    pub verse: VerseRecord,
    /// Position of the verse in the corpus.
    pub corpus_index: u64,
    /// Similarity in [0, 1].
    pub confidence: f64,
    /// `confidence` as a 0-100 percentage, unrounded. Renderers pick the precision.
    pub score_percent: f64,
    /// Normalized offset of the fragment in the verse.
    pub position: Option<u64>,
    pub prefix_length: u64,
    pub kind: MatchKind,
    pub lines: Vec<HighlightedLine>,
}

/// Search result container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub matches: Vec<VerseMatch>,
    /// Verses that passed every filter before truncation to `max_results`.
    pub total_count: u64,
}

/// Error type for versefind operations
#[derive(Debug, Error)]
pub enum VerseFinderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Corpus error: {0}")]
    Corpus(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Operation cancelled")]
    Cancelled,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The primary interface for searching a verse corpus.
/// This matches the functionality exposed by the `VerseStore` object.
#[async_trait::async_trait]
pub trait VerseFinderApi: Send + Sync {
    /// Search with the store's configured options. Blank queries are rejected.
    async fn search(&self, query: String) -> Result<SearchResult, VerseFinderError>;

    /// Search with one-off options instead of the store's own.
    async fn search_with_options(
        &self,
        query: String,
        options: crate::config::SearchOptions,
    ) -> Result<SearchResult, VerseFinderError>;

    /// Number of verses in the corpus
    fn verse_count(&self) -> u64;

    /// Distinct "cited in" sources, sorted for display and split into title/author.
    fn cited_sources(&self) -> Vec<CitedItem>;
}

impl From<crate::loader::LoaderError> for VerseFinderError {
    fn from(e: crate::loader::LoaderError) -> Self {
        VerseFinderError::Corpus(e.to_string())
    }
}

impl From<crate::config::ConfigError> for VerseFinderError {
    fn from(e: crate::config::ConfigError) -> Self {
        VerseFinderError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighted_line_text_reconstructs() {
        let line = HighlightedLine {
            runs: vec![
                HighlightRun { text: "sarva-dharmān".into(), highlighted: true },
                HighlightRun { text: " parityajya".into(), highlighted: false },
            ],
        };
        assert_eq!(line.text(), "sarva-dharmān parityajya");
        assert!(line.has_highlight());
        assert!(!HighlightedLine::plain("vraja").has_highlight());
    }

    #[test]
    fn test_error_conversions() {
        let err: VerseFinderError = crate::loader::LoaderError::MissingColumn("IAST Verse").into();
        assert!(matches!(err, VerseFinderError::Corpus(_)));
        assert!(err.to_string().contains("IAST Verse"));
    }
}
