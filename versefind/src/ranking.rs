//! Corpus-level ranking.
//!
//! Every verse is scored in parallel, filtered, then put into a total order so
//! that the result never depends on which rayon worker finished first:
//!
//! 1. confidence, higher first
//! 2. prefix_length, longer first
//! 3. position, earlier first; unlocated fragments last
//! 4. corpus index (stable tiebreaker)

use crate::align::resolve_highlights;
use crate::candidate::{Corpus, Verse};
use crate::config::SearchOptions;
use crate::highlight::count_highlighted_words;
use crate::interface::VerseFinderError;
use crate::matcher::{match_normalized, FragmentMatch};
use crate::normalize::normalize;
use rayon::prelude::*;
use std::cmp::Ordering;
use tokio_util::sync::CancellationToken;

/// A verse that survived filtering, with its score.
#[derive(Debug, Clone)]
pub struct RankedVerse<'a> {
    pub index: usize,
    pub verse: &'a Verse,
    pub fragment: FragmentMatch,
}

/// Ranked matches plus the number that passed filtering before truncation.
#[derive(Debug, Clone, Default)]
pub struct Ranking<'a> {
    pub verses: Vec<RankedVerse<'a>>,
    pub total_count: usize,
}

/// Total order over scored verses. `Less` means `a` ranks higher.
pub fn compare_ranked(a_index: usize, a: &FragmentMatch, b_index: usize, b: &FragmentMatch) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.prefix_length.cmp(&a.prefix_length))
        .then_with(|| match (a.position, b.position) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a_index.cmp(&b_index))
}

/// Number of words in a raw query that survive normalization.
pub fn query_word_count(query: &str) -> usize {
    query
        .split_whitespace()
        .filter(|word| !normalize(word).is_empty())
        .count()
}

/// Rank `corpus` against a raw query.
///
/// Blank queries rank nothing. Returns `Cancelled` if the token fires before
/// the scan completes.
pub fn rank_corpus<'a>(
    query: &str,
    corpus: &'a Corpus,
    options: &SearchOptions,
    token: &CancellationToken,
) -> Result<Ranking<'a>, VerseFinderError> {
    let normalized: Vec<char> = normalize(query).chars().collect();
    if normalized.is_empty() {
        return Ok(Ranking::default());
    }
    let max_words = query_word_count(query);

    let mut ranked: Vec<RankedVerse<'a>> = corpus
        .verses()
        .par_iter()
        .enumerate()
        .take_any_while(|_| !token.is_cancelled())
        .filter_map(|(index, verse)| {
            let fragment = match_normalized(&normalized, verse.normalized(), &options.matching);
            if !fragment.is_usable() || fragment.confidence < options.min_confidence {
                return None;
            }
            if options.enable_word_coverage_filter && !within_word_budget(&normalized, verse, max_words, options) {
                return None;
            }
            Some(RankedVerse { index, verse, fragment })
        })
        .collect();

    if token.is_cancelled() {
        return Err(VerseFinderError::Cancelled);
    }

    ranked.sort_unstable_by(|a, b| compare_ranked(a.index, &a.fragment, b.index, &b.fragment));
    let total_count = ranked.len();
    ranked.truncate(options.max_results);

    Ok(Ranking { verses: ranked, total_count })
}

/// Whether the highlight for `query` spreads over at most `max_words` words.
fn within_word_budget(query: &[char], verse: &Verse, max_words: usize, options: &SearchOptions) -> bool {
    let set = resolve_highlights(query, verse.display_text(), verse.lines(), &options.matching);
    count_highlighted_words(verse.lines(), &set) <= max_words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchKind;
    use crate::models::VerseRecord;

    fn scored(confidence: f64, position: Option<usize>) -> FragmentMatch {
        FragmentMatch { confidence, position, prefix_length: 0, kind: MatchKind::Fuzzy }
    }

    fn corpus(verses: &[&str]) -> Corpus {
        Corpus::from_records(verses.iter().map(|v| VerseRecord::from_verse(*v)))
    }

    #[test]
    fn test_compare_ranked_order() {
        let mut entries = vec![
            (0, scored(0.9, Some(3))),
            (1, scored(0.9, Some(5))),
            (2, scored(0.95, Some(0))),
        ];
        entries.sort_by(|a, b| compare_ranked(a.0, &a.1, b.0, &b.1));
        let order: Vec<usize> = entries.iter().map(|e| e.0).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_compare_ranked_tiebreakers() {
        let long_prefix = FragmentMatch { prefix_length: 4, ..scored(0.8, Some(9)) };
        assert_eq!(compare_ranked(5, &long_prefix, 0, &scored(0.8, Some(0))), Ordering::Less);
        assert_eq!(compare_ranked(0, &scored(0.8, None), 1, &scored(0.8, Some(7))), Ordering::Greater);
        assert_eq!(compare_ranked(1, &scored(0.8, Some(2)), 4, &scored(0.8, Some(2))), Ordering::Less);
    }

    #[test]
    fn test_query_word_count() {
        assert_eq!(query_word_count("sarva-dharmān parityajya"), 2);
        assert_eq!(query_word_count("  rāma | rāma  "), 2);
        assert_eq!(query_word_count(""), 0);
    }

    #[test]
    fn test_rank_corpus_filters_and_orders() {
        let corpus = corpus(&[
            "govinda",
            "sarva-dharmān parityajya māṁ ekaṁ",
            "aham tvāṁ sarva-pāpebhyo",
            "sarva-dharmān parityajya",
        ]);
        let token = CancellationToken::new();
        let ranking = rank_corpus("sarva-dharmān parityajya", &corpus, &SearchOptions::default(), &token).unwrap();

        let indices: Vec<usize> = ranking.verses.iter().map(|r| r.index).collect();
        // exact and prefix both score 1.0 with the same prefix length and
        // position; corpus order decides
        assert_eq!(&indices[..2], &[1, 3]);
        assert!(!indices.contains(&0));
        assert_eq!(ranking.total_count, indices.len());
        assert!(ranking.verses.iter().all(|r| r.fragment.confidence >= 0.3));
    }

    #[test]
    fn test_rank_corpus_truncates_but_counts_all() {
        let corpus = corpus(&["rama", "rama rama", "rama rama rama"]);
        let options = SearchOptions { max_results: 1, ..SearchOptions::default() };
        let ranking = rank_corpus("rama", &corpus, &options, &CancellationToken::new()).unwrap();
        assert_eq!(ranking.verses.len(), 1);
        assert_eq!(ranking.verses[0].index, 0);
        assert_eq!(ranking.total_count, 3);
    }

    #[test]
    fn test_rank_corpus_blank_query() {
        let corpus = corpus(&["rama"]);
        let ranking = rank_corpus(" - ", &corpus, &SearchOptions::default(), &CancellationToken::new()).unwrap();
        assert!(ranking.verses.is_empty());
        assert_eq!(ranking.total_count, 0);
    }

    #[test]
    fn test_rank_corpus_cancelled() {
        let corpus = corpus(&["rama", "sita"]);
        let token = CancellationToken::new();
        token.cancel();
        let result = rank_corpus("rama", &corpus, &SearchOptions::default(), &token);
        assert!(matches!(result, Err(VerseFinderError::Cancelled)));
    }

    #[test]
    fn test_word_coverage_filter_drops_spread_highlights() {
        // the fuzzy alignment of "ramakrsna" spreads over "rama" and "krishna"
        let corpus = corpus(&["rama krishna hare", "ramakrsna"]);
        let query = "ramakrsna";
        let token = CancellationToken::new();

        let loose = rank_corpus(query, &corpus, &SearchOptions::default(), &token).unwrap();
        assert_eq!(loose.total_count, 2);

        let strict = SearchOptions { enable_word_coverage_filter: true, ..SearchOptions::default() };
        let ranking = rank_corpus(query, &corpus, &strict, &token).unwrap();
        let indices: Vec<usize> = ranking.verses.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1]);
    }
}
