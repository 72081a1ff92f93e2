//! Span resolution: which original characters to highlight for a query.
//!
//! The fragment is located in normalized space, aligned against a window of
//! the candidate with matching blocks, and every matched normalized character
//! is mapped back through the position table to a (line, column) pair.

use crate::config::MatchOptions;
use crate::matcher::find_fragment_position;
use crate::normalize::{is_silent, NormalizedText, SourcePosition};
use crate::similarity::{find_subslice, longest_match, matching_blocks};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;

/// Original-text coordinates to highlight.
pub type HighlightSet = HashSet<SourcePosition>;

/// Resolve the highlight set of a normalized `query` inside `text`.
///
/// `lines` must be the lines `text` was built from; they are only consulted
/// to bridge separators between highlighted characters. An empty set means
/// the fragment could not be located.
pub fn resolve_highlights<S: AsRef<str>>(
    query: &[char],
    text: &NormalizedText,
    lines: &[S],
    options: &MatchOptions,
) -> HighlightSet {
    let mut set = HighlightSet::new();
    let candidate = text.chars();
    if query.is_empty() || candidate.is_empty() {
        return set;
    }

    let Some(offset) = locate(query, candidate, options) else {
        return set;
    };

    let margin = (query.len() as f64 * options.alignment_margin).ceil() as usize;
    let start = offset.saturating_sub(margin);
    let end = offset
        .saturating_add(query.len())
        .saturating_add(margin)
        .min(candidate.len());
    if start >= end {
        return set;
    }

    for block in matching_blocks(query, &candidate[start..end], options.min_block_len) {
        for index in start + block.b_start..start + block.b_start + block.size {
            if let Some(pos) = text.source_position(index) {
                set.insert(pos);
            }
        }
    }

    bridge_silent_gaps(lines, &mut set);
    set
}

/// Offset where the aligned window is anchored.
fn locate(query: &[char], candidate: &[char], options: &MatchOptions) -> Option<usize> {
    if options.enable_fuzzy_tier {
        return find_fragment_position(query, candidate, options);
    }
    if let Some(offset) = find_subslice(candidate, query) {
        return Some(offset);
    }
    let block = longest_match(query, candidate, (0, query.len()), (0, candidate.len()));
    let required = query.len() as f64 * options.longest_block_min_coverage;
    if block.size == 0 || (block.size as f64) < required {
        return None;
    }
    // line the query start up with the block
    Some(block.b_start.saturating_sub(block.a_start))
}

/// Extend highlights over characters that normalize to nothing.
///
/// Within a line, a run of such characters between two highlighted ones is
/// highlighted unless it contains whitespace ("sarva-dharmān" stays one run,
/// the space before "parityajya" does not). Combining marks trailing a
/// highlighted character follow it.
fn bridge_silent_gaps<S: AsRef<str>>(lines: &[S], set: &mut HighlightSet) {
    let mut additions = Vec::new();

    for (line, text) in lines.iter().enumerate() {
        let chars: Vec<char> = text.as_ref().chars().collect();
        let marked = |column: usize| set.contains(&SourcePosition { line, column });

        let mut column = 0;
        while column < chars.len() {
            if !marked(column) {
                column += 1;
                continue;
            }
            let gap_start = column + 1;
            let mut gap_end = gap_start;
            while gap_end < chars.len() && !marked(gap_end) && is_silent(chars[gap_end]) {
                gap_end += 1;
            }

            let closed = gap_end < chars.len() && marked(gap_end);
            let gap = &chars[gap_start..gap_end];
            if closed && !gap.iter().any(|c| c.is_whitespace()) {
                additions.extend((gap_start..gap_end).map(|column| SourcePosition { line, column }));
            } else {
                let marks = gap.iter().take_while(|c| is_combining_mark(**c)).count();
                additions.extend((gap_start..gap_start + marks).map(|column| SourcePosition { line, column }));
            }
            column = gap_end.max(column + 1);
        }
    }

    set.extend(additions);
}
