//! versefind - locate half-remembered Sanskrit verse fragments
//!
//! This library finds where a typed fragment of transliterated Sanskrit occurs
//! in a corpus of verses, tolerating missing diacritics, hyphenation, case and
//! spelling slips, and reports which characters of the original verse lines
//! the fragment covers.
//!
//! Pipeline: `normalize` → `matcher` (per verse) → `ranking` (whole corpus,
//! parallel) → `align` + `highlight` (display spans). `VerseStore` wraps it
//! all behind the async `VerseFinderApi`.

pub mod align;
pub mod candidate;
pub mod config;
pub mod highlight;
pub mod interface;
pub mod labels;
pub mod loader;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod similarity;
mod store;

pub use candidate::{Corpus, Verse};
pub use config::{ConfigError, MatchOptions, SearchOptions};
pub use interface::*;
pub use labels::CitedItem;
pub use loader::LoaderError;
pub use matcher::{match_fragment, FragmentMatch, MatchKind};
pub use models::VerseRecord;
pub use store::VerseStore;
