//! Comparison normalization with a reversible position table.
//!
//! The comparison form drops diacritics, whitespace, hyphens and punctuation
//! and folds case, so "Sarva-dharmān" and "sarvadharman" compare equal.
//! Folding is done one source character at a time: the whole-string result is
//! always the concatenation of the per-character results, which is what lets
//! `normalize_with_positions` map every output character back to the
//! (line, column) that produced it.

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Location of a character in the original multi-line text.
/// Both fields count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

/// Normalized text plus, for each normalized character, where it came from.
///
/// Invariant: `chars.len() == positions.len()`, and `positions` is
/// non-decreasing because lines and columns are walked in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    chars: Vec<char>,
    positions: Vec<SourcePosition>,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn positions(&self) -> &[SourcePosition] {
        &self.positions
    }

    /// Source coordinate of the normalized character at `index`.
    pub fn source_position(&self, index: usize) -> Option<SourcePosition> {
        self.positions.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Fold one source character into zero or more comparison characters.
fn fold_char(c: char, mut emit: impl FnMut(char)) {
    decompose_canonical(c, |d| {
        if is_combining_mark(d) || !d.is_alphanumeric() {
            return;
        }
        // Lower-casing can reintroduce marks ('İ' -> "i\u{307}"), filter again.
        for lower in d.to_lowercase() {
            if lower.is_alphanumeric() && !is_combining_mark(lower) {
                emit(lower);
            }
        }
    });
}

/// Normalized form of a single character. Empty for marks, whitespace and
/// punctuation.
pub fn normalize_char(c: char) -> String {
    let mut out = String::new();
    fold_char(c, |n| out.push(n));
    out
}

/// Whether `c` disappears entirely under normalization.
pub fn is_silent(c: char) -> bool {
    let mut silent = true;
    fold_char(c, |_| silent = false);
    silent
}

/// Canonical comparison form of `text`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        fold_char(c, |n| out.push(n));
    }
    out
}

/// Normalize `lines` and record the source coordinate of every output
/// character.
pub fn normalize_with_positions<S: AsRef<str>>(lines: &[S]) -> NormalizedText {
    let mut result = NormalizedText::default();
    for (line, text) in lines.iter().enumerate() {
        for (column, c) in text.as_ref().chars().enumerate() {
            fold_char(c, |n| {
                result.text.push(n);
                result.chars.push(n);
                result.positions.push(SourcePosition { line, column });
            });
        }
    }
    result
}

/// Sort key for human-facing labels: diacritics and case removed, spacing and
/// punctuation kept. Not a comparison form.
pub fn normalize_for_sorting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        decompose_canonical(c, |d| {
            if !is_combining_mark(d) {
                out.extend(d.to_lowercase().filter(|l| !is_combining_mark(*l)));
            }
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics_case_and_separators() {
        assert_eq!(normalize("Sarva-dharmān parityajya"), "sarvadharmanparityajya");
        assert_eq!(normalize("māṁ ekaṁ\nśaraṇaṁ vraja"), "mamekamsaranamvraja");
    }

    #[test]
    fn test_normalize_drops_punctuation_keeps_digits() {
        assert_eq!(normalize("|| 18.66 ||"), "1866");
        assert_eq!(normalize("vraja; (BG)"), "vrajabg");
        assert_eq!(normalize("a_b"), "ab");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" - \n\t"), "");
    }

    #[test]
    fn test_normalize_precomposed_and_decomposed_agree() {
        let composed = "\u{015B}ara\u{1E47}a\u{1E41}";
        let decomposed = "s\u{0301}aran\u{0323}am\u{0307}";
        assert_eq!(normalize(composed), "saranam");
        assert_eq!(normalize(decomposed), "saranam");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "sarva-dharmān parityajya",
            "İstanbul ŞEHİR",
            "dharmakṣetre kurukṣetre\nsamavetā yuyutsavaḥ",
            "ॐ नमः शिवाय",
            "Straße ΣΟΦΊΑ",
            "12-34 ..!! ",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_normalize_dotted_capital_i_has_no_leftover_mark() {
        assert_eq!(normalize("İ"), "i");
    }

    #[test]
    fn test_normalize_char_one_to_zero_and_one() {
        assert_eq!(normalize_char('-'), "");
        assert_eq!(normalize_char('\u{0304}'), "");
        assert_eq!(normalize_char('Ā'), "a");
        assert!(is_silent(' '));
        assert!(!is_silent('ṁ'));
    }

    #[test]
    fn test_positions_track_source_coordinates() {
        let lines = ["sa-rva", "dhā"];
        let nt = normalize_with_positions(&lines);
        assert_eq!(nt.as_str(), "sarvadha");
        assert_eq!(nt.len(), nt.positions().len());
        let cols: Vec<(usize, usize)> = nt.positions().iter().map(|p| (p.line, p.column)).collect();
        assert_eq!(
            cols,
            vec![(0, 0), (0, 1), (0, 3), (0, 4), (0, 5), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_positions_with_decomposed_marks() {
        // "a" + combining macron: the mark produces no entry
        let lines = ["a\u{0304}b"];
        let nt = normalize_with_positions(&lines);
        assert_eq!(nt.as_str(), "ab");
        assert_eq!(nt.source_position(1), Some(SourcePosition { line: 0, column: 2 }));
    }

    #[test]
    fn test_positions_match_whole_string_normalization() {
        let lines = ["Dharmakṣetre kurukṣetre", "samavetā yuyutsavaḥ |"];
        let nt = normalize_with_positions(&lines);
        assert_eq!(nt.as_str(), normalize(&lines.join("\n")));
        assert!(nt.positions().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_normalize_for_sorting_keeps_spacing() {
        assert_eq!(normalize_for_sorting("Śrīmad Bhāgavatam, 1.2"), "srimad bhagavatam, 1.2");
        assert_eq!(normalize_for_sorting(""), "");
    }
}
