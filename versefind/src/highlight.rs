//! Turning a highlight set into per-line runs.

use crate::align::HighlightSet;
use crate::interface::{HighlightRun, HighlightedLine};
use crate::normalize::SourcePosition;

/// Split every line into alternating highlighted/plain runs.
///
/// Lines without any highlighted character come back as a single plain run.
/// Concatenating the runs of a line always yields the line unchanged.
pub fn render<S: AsRef<str>>(lines: &[S], set: &HighlightSet) -> Vec<HighlightedLine> {
    lines
        .iter()
        .enumerate()
        .map(|(line, text)| render_line(line, text.as_ref(), set))
        .collect()
}

fn render_line(line: usize, text: &str, set: &HighlightSet) -> HighlightedLine {
    let marked = |column: usize| set.contains(&SourcePosition { line, column });

    if set.is_empty() || !(0..text.chars().count()).any(marked) {
        return HighlightedLine::plain(text);
    }

    let mut runs: Vec<HighlightRun> = Vec::new();
    for (column, c) in text.chars().enumerate() {
        let highlighted = marked(column);
        match runs.last_mut() {
            Some(run) if run.highlighted == highlighted => run.text.push(c),
            _ => runs.push(HighlightRun { text: c.to_string(), highlighted }),
        }
    }
    HighlightedLine { runs }
}

/// Number of whitespace-separated words (counted by position, not by
/// spelling) that contain at least one highlighted character.
pub fn count_highlighted_words<S: AsRef<str>>(lines: &[S], set: &HighlightSet) -> usize {
    if set.is_empty() {
        return 0;
    }

    let mut count = 0;
    for (line, text) in lines.iter().enumerate() {
        let mut in_word = false;
        let mut word_hit = false;
        for (column, c) in text.as_ref().chars().enumerate() {
            if c.is_whitespace() {
                if in_word && word_hit {
                    count += 1;
                }
                in_word = false;
                word_hit = false;
                continue;
            }
            in_word = true;
            word_hit |= set.contains(&SourcePosition { line, column });
        }
        if in_word && word_hit {
            count += 1;
        }
    }
    count
}
