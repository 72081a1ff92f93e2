//! String similarity kernels over normalized character slices.
//!
//! Everything here works on `&[char]` so offsets are character offsets into
//! the normalized text, the same unit the position table is indexed by.

/// A run of `size` characters common to `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Length of the longest common subsequence, using two rolling rows.
pub fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let n = b.len();
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for &ac in a {
        for j in 1..=n {
            curr[j] = if ac == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Indel similarity in [0, 1]: `2 * LCS / (|a| + |b|)`.
/// Equivalent to 1 - normalized insert/delete edit distance. Symmetric.
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(a, b) as f64 / total as f64
}

/// Best-scoring window of `needle.len()` characters in `haystack`.
///
/// Returns `(offset, ratio)` of the earliest best window. When the needle is
/// at least as long as the haystack the whole haystack is the only window.
/// `None` only when either side is empty.
pub fn best_window(needle: &[char], haystack: &[char]) -> Option<(usize, f64)> {
    if needle.is_empty() || haystack.is_empty() {
        return None;
    }
    if needle.len() >= haystack.len() {
        return Some((0, ratio(needle, haystack)));
    }

    let width = needle.len();
    let mut best = (0, -1.0_f64);
    for (offset, window) in haystack.windows(width).enumerate() {
        let score = ratio(needle, window);
        if score > best.1 {
            best = (offset, score);
            if score >= 1.0 {
                break;
            }
        }
    }
    Some(best)
}

/// First offset of `needle` as a contiguous run in `haystack`.
pub fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Length of the common leading run of `a` and `b`.
pub fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Longest common contiguous block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
/// A zero-size block means nothing is shared.
pub fn longest_match(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> MatchingBlock {
    let mut best = MatchingBlock { a_start: alo, b_start: blo, size: 0 };
    if alo >= ahi || blo >= bhi {
        return best;
    }

    // run[j + 1] = length of the common run ending at a[i], b[blo + j]
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in 0..width {
            curr[j + 1] = if a[i] == b[blo + j] { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best.size {
                best = MatchingBlock {
                    a_start: i + 1 - k,
                    b_start: blo + j + 1 - k,
                    size: k,
                };
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// All matching blocks between `a` and `b`, in order.
///
/// Finds the longest common block, then recurses into the pieces to its
/// left and right, stopping when no block of at least `min_size` remains.
/// Adjacent blocks are merged.
pub fn matching_blocks(a: &[char], b: &[char], min_size: usize) -> Vec<MatchingBlock> {
    let min_size = min_size.max(1);
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    let mut found = Vec::new();

    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        let block = longest_match(a, b, (alo, ahi), (blo, bhi));
        if block.size < min_size {
            continue;
        }
        let (i, j, k) = (block.a_start, block.b_start, block.size);
        if alo < i && blo < j {
            pending.push(((alo, i), (blo, j)));
        }
        if i + k < ahi && j + k < bhi {
            pending.push(((i + k, ahi), (j + k, bhi)));
        }
        found.push(block);
    }

    found.sort_unstable_by_key(|m| (m.a_start, m.b_start));

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len());
    for block in found {
        if let Some(last) = merged.last_mut() {
            if last.a_start + last.size == block.a_start && last.b_start + last.size == block.b_start {
                last.size += block.size;
                continue;
            }
        }
        merged.push(block);
    }
    merged
}

/// Matching-blocks similarity: `2 * M / (|a| + |b|)` where M is the number
/// of characters covered by matching blocks.
pub fn blocks_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b, 1).iter().map(|m| m.size).sum();
    2.0 * matched as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_lcs_len() {
        assert_eq!(lcs_len(&chars("abcde"), &chars("ace")), 3);
        assert_eq!(lcs_len(&chars("abc"), &chars("")), 0);
        assert_eq!(lcs_len(&chars("rama"), &chars("rama")), 4);
    }

    #[test]
    fn test_ratio_bounds_and_symmetry() {
        let a = chars("dharma");
        let b = chars("karma");
        assert_eq!(ratio(&a, &a), 1.0);
        assert_eq!(ratio(&a, &b), ratio(&b, &a));
        // lcs "arma" = 4 -> 8 / 11
        assert!((ratio(&a, &b) - 8.0 / 11.0).abs() < 1e-9);
        assert_eq!(ratio(&chars("abc"), &chars("xyz")), 0.0);
        assert_eq!(ratio(&[], &[]), 1.0);
    }

    #[test]
    fn test_best_window_finds_embedded_fragment() {
        let needle = chars("kuruksetre");
        let haystack = chars("dharmaksetrekuruksatresamaveta");
        let (offset, score) = best_window(&needle, &haystack).unwrap();
        assert_eq!(offset, 12);
        assert!((score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_best_window_needle_longer_than_haystack() {
        let (offset, score) = best_window(&chars("ramayana"), &chars("rama")).unwrap();
        assert_eq!(offset, 0);
        assert!((score - 8.0 / 12.0).abs() < 1e-9);
        assert_eq!(best_window(&[], &chars("rama")), None);
    }

    #[test]
    fn test_find_subslice() {
        let hay = chars("sarvadharman");
        assert_eq!(find_subslice(&hay, &chars("dharma")), Some(5));
        assert_eq!(find_subslice(&hay, &chars("karma")), None);
        assert_eq!(find_subslice(&hay, &[]), None);
    }

    #[test]
    fn test_common_prefix_len() {
        assert_eq!(common_prefix_len(&chars("sarvam"), &chars("sarga")), 3);
        assert_eq!(common_prefix_len(&chars(""), &chars("sarga")), 0);
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a = chars("abxab");
        let b = chars("zab");
        let m = longest_match(&a, &b, (0, a.len()), (0, b.len()));
        assert_eq!(m, MatchingBlock { a_start: 0, b_start: 1, size: 2 });
    }

    #[test]
    fn test_matching_blocks_recurse_both_sides() {
        let a = chars("sarvadharmaanhparityajya");
        let b = chars("sarvadharmanparityajyamam");
        let blocks = matching_blocks(&a, &b, 1);
        assert_eq!(
            blocks,
            vec![
                MatchingBlock { a_start: 0, b_start: 0, size: 11 },
                MatchingBlock { a_start: 12, b_start: 11, size: 1 },
                MatchingBlock { a_start: 14, b_start: 12, size: 10 },
            ]
        );
    }

    #[test]
    fn test_matching_blocks_min_size_prunes_singletons() {
        let a = chars("sarvadharmaanhparityajya");
        let b = chars("sarvadharmanparityajyamam");
        let blocks = matching_blocks(&a, &b, 2);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|m| m.size >= 2));
    }

    #[test]
    fn test_matching_blocks_none_shared() {
        assert!(matching_blocks(&chars("abc"), &chars("xyz"), 1).is_empty());
        assert!(matching_blocks(&[], &chars("xyz"), 1).is_empty());
    }

    #[test]
    fn test_blocks_ratio() {
        // "abcd" vs "bcda": block "bcd" = 3 -> 6 / 8
        assert!((blocks_ratio(&chars("abcd"), &chars("bcda")) - 0.75).abs() < 1e-9);
    }
}
