//! Tiered fragment matching.
//!
//! A query is scored against one candidate by the first tier that applies:
//! empty → identical → prefix → substring → fuzzy (or longest common block
//! when the fuzzy tier is disabled). Every outcome is a value; there is no
//! failure path.

use crate::config::MatchOptions;
use crate::normalize::normalize;
use crate::similarity::{
    best_window, blocks_ratio, common_prefix_len, find_subslice, longest_match, ratio,
};
use serde::Serialize;

/// Confidence assigned to a contiguous substring match.
pub const SUBSTRING_CONFIDENCE: f64 = 0.95;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    NoMatch,
    Exact,
    Prefix,
    Substring,
    Fuzzy,
    LongestBlock,
}

/// Score of one query against one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentMatch {
    /// Similarity in [0, 1].
    pub confidence: f64,
    /// Normalized offset of the fragment in the candidate, `None` when it
    /// could not be located.
    pub position: Option<usize>,
    /// Common leading characters of query and candidate. Tie-breaker only.
    pub prefix_length: usize,
    pub kind: MatchKind,
}

impl FragmentMatch {
    pub const NONE: FragmentMatch = FragmentMatch {
        confidence: 0.0,
        position: None,
        prefix_length: 0,
        kind: MatchKind::NoMatch,
    };

    /// Whether this match can be surfaced at all.
    pub fn is_usable(&self) -> bool {
        self.confidence > 0.0 && self.position.is_some()
    }
}

/// Match two raw strings. Both are normalized first.
pub fn match_fragment(query: &str, candidate: &str, options: &MatchOptions) -> FragmentMatch {
    let query: Vec<char> = normalize(query).chars().collect();
    let candidate: Vec<char> = normalize(candidate).chars().collect();
    match_normalized(&query, &candidate, options)
}

/// Match pre-normalized character slices.
pub fn match_normalized(query: &[char], candidate: &[char], options: &MatchOptions) -> FragmentMatch {
    if query.is_empty() || candidate.is_empty() {
        return FragmentMatch::NONE;
    }

    if query == candidate {
        return FragmentMatch {
            confidence: 1.0,
            position: Some(0),
            prefix_length: query.len(),
            kind: MatchKind::Exact,
        };
    }

    if candidate.starts_with(query) {
        return FragmentMatch {
            confidence: 1.0,
            position: Some(0),
            prefix_length: query.len(),
            kind: MatchKind::Prefix,
        };
    }

    if let Some(offset) = find_subslice(candidate, query) {
        return FragmentMatch {
            confidence: SUBSTRING_CONFIDENCE,
            position: Some(offset),
            prefix_length: query.len(),
            kind: MatchKind::Substring,
        };
    }

    let prefix_length = common_prefix_len(query, candidate);

    if !options.enable_fuzzy_tier {
        let block = longest_match(query, candidate, (0, query.len()), (0, candidate.len()));
        return FragmentMatch {
            confidence: blocks_ratio(query, candidate).clamp(0.0, 1.0),
            position: (block.size > 0).then_some(block.b_start),
            prefix_length,
            kind: MatchKind::LongestBlock,
        };
    }

    let mut confidence = ratio(query, candidate);
    let mut position = None;
    if let Some((offset, window_score)) = best_window(query, candidate) {
        if query.len() < candidate.len() {
            confidence = confidence.max(window_score);
        }
        if accepts(window_score, options) {
            position = Some(offset);
        }
    }

    FragmentMatch {
        confidence: confidence.clamp(0.0, 1.0),
        position,
        prefix_length,
        kind: MatchKind::Fuzzy,
    }
}

fn accepts(window_score: f64, options: &MatchOptions) -> bool {
    window_score * 100.0 > options.fuzzy_acceptance_threshold
}

/// Offset of `query` inside `candidate` (both normalized).
///
/// Exact occurrence first, then the best-scoring query-length window if it
/// clears the acceptance threshold.
pub fn find_fragment_position(query: &[char], candidate: &[char], options: &MatchOptions) -> Option<usize> {
    if let Some(offset) = find_subslice(candidate, query) {
        return Some(offset);
    }
    let (offset, score) = best_window(query, candidate)?;
    accepts(score, options).then_some(offset)
}
