//! Source and author labels.
//!
//! Corpus fields spell attributions loosely: "by Vyāsa", "Vyāsa",
//! "Bhagavad-gītā As It Is by A.C. Bhaktivedanta Swami". These helpers turn
//! them into structured labels; rendering them is up to the caller.

use crate::models::VerseRecord;
use crate::normalize::normalize_for_sorting;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

static LEADING_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*by\s+").expect("valid regex"));
static BY_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+by\s+").expect("valid regex"));

/// Author name without a leading "by".
pub fn clean_author(author: &str) -> String {
    LEADING_BY.replace(author, "").trim().to_string()
}

/// "source (by author)", or whichever half exists. `None` when both are empty.
pub fn format_source_and_author(source: &str, author: &str) -> Option<String> {
    let source = source.trim();
    let author = clean_author(author);
    match (source.is_empty(), author.is_empty()) {
        (false, false) => Some(format!("{source} (by {author})")),
        (false, true) => Some(source.to_string()),
        (true, false) => Some(format!("(by {author})")),
        (true, true) => None,
    }
}

/// A "cited in" entry split into title and author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitedItem {
    pub title: String,
    pub author: Option<String>,
}

impl CitedItem {
    /// Split on the first " by " (any case). Text without one is all title.
    pub fn parse(text: &str) -> Self {
        let mut parts = BY_SEPARATOR.splitn(text, 2);
        let title = parts.next().unwrap_or_default().trim();
        match parts.next() {
            Some(author) => Self {
                title: title.to_string(),
                author: Some(author.trim().to_string()),
            },
            None => Self {
                title: text.trim().to_string(),
                author: None,
            },
        }
    }
}

/// Distinct non-empty `cited_in` values, in reading order: diacritics and
/// case are ignored for ordering, raw text breaks ties.
pub fn cited_sources<'a>(records: impl IntoIterator<Item = &'a VerseRecord>) -> Vec<String> {
    let distinct: BTreeSet<&str> = records
        .into_iter()
        .map(|r| r.cited_in.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let mut keyed: Vec<(String, &str)> = distinct
        .into_iter()
        .map(|c| (normalize_for_sorting(c), c))
        .collect();
    keyed.sort();
    keyed.into_iter().map(|(_, c)| c.to_string()).collect()
}
