//! Search configuration
//!
//! Options can come from code, from a TOML file passed explicitly, or from
//! `.versefindrc.toml` in the current directory / `~/.config/versefind/config.toml`.
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! max_results = 10
//! min_confidence = 0.5
//! enable_fuzzy_tier = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Knobs of the fragment matcher and the span aligner.
///
/// The thresholds were tuned by hand on a small corpus and should be
/// recalibrated against labelled queries before being trusted elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Score candidates by edit-distance similarity when no exact tier applies.
    /// When off, fall back to the longest-common-block score.
    pub enable_fuzzy_tier: bool,
    /// Minimum window score (0-100) for a fuzzy position to be accepted.
    pub fuzzy_acceptance_threshold: f64,
    /// Extra context, as a fraction of the query length, aligned on each side
    /// of the located fragment when computing highlights.
    pub alignment_margin: f64,
    /// Smallest matching block that counts toward a highlight.
    pub min_block_len: usize,
    /// Exact-only mode: fraction of the query the longest common block must
    /// cover before a position is accepted.
    pub longest_block_min_coverage: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            enable_fuzzy_tier: true,
            fuzzy_acceptance_threshold: 70.0,
            alignment_margin: 0.2,
            min_block_len: 1,
            longest_block_min_coverage: 0.6,
        }
    }
}

/// Corpus-level search options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum number of verses returned.
    pub max_results: usize,
    /// Results scoring below this confidence (0-1) are dropped.
    pub min_confidence: f64,
    /// Drop matches whose highlight spreads over more words than the query has.
    pub enable_word_coverage_filter: bool,
    #[serde(flatten)]
    pub matching: MatchOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 20,
            min_confidence: 0.3,
            enable_word_coverage_filter: false,
            matching: MatchOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid option `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

const LOCAL_CONFIG_FILE: &str = ".versefindrc.toml";

/// Largest accepted `alignment_margin`: ten query lengths on each side.
pub const MAX_ALIGNMENT_MARGIN: f64 = 10.0;

impl SearchOptions {
    /// Check value ranges. Called by the store before any search runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: String) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.max_results == 0 {
            return invalid("max_results", "must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return invalid("min_confidence", format!("{} is outside 0..=1", self.min_confidence));
        }
        let m = &self.matching;
        if !(0.0..=100.0).contains(&m.fuzzy_acceptance_threshold) {
            return invalid(
                "fuzzy_acceptance_threshold",
                format!("{} is outside 0..=100", m.fuzzy_acceptance_threshold),
            );
        }
        if !(0.0..=MAX_ALIGNMENT_MARGIN).contains(&m.alignment_margin) {
            return invalid(
                "alignment_margin",
                format!("{} is outside 0..={MAX_ALIGNMENT_MARGIN}", m.alignment_margin),
            );
        }
        if m.min_block_len == 0 {
            return invalid("min_block_len", "must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&m.longest_block_min_coverage) {
            return invalid(
                "longest_block_min_coverage",
                format!("{} is outside 0..=1", m.longest_block_min_coverage),
            );
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Discover a config file.
    ///
    /// Precedence (highest to lowest):
    /// 1. .versefindrc.toml in current directory
    /// 2. ~/.config/versefind/config.toml
    ///
    /// Falls back to defaults when neither exists. A file that exists but
    /// does not parse is an error rather than being silently skipped.
    pub fn discover() -> Result<Self, ConfigError> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "using local config");
            return Self::load_from_path(&local);
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("versefind").join("config.toml");
            if path.is_file() {
                tracing::debug!(path = %path.display(), "using user config");
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let options = SearchOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.max_results, 20);
        assert_eq!(options.min_confidence, 0.3);
        assert!(options.matching.enable_fuzzy_tier);
        assert!(!options.enable_word_coverage_filter);
        assert_eq!(options.matching.fuzzy_acceptance_threshold, 70.0);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let options = SearchOptions::from_toml_str(
            "max_results = 5\nenable_fuzzy_tier = false\nalignment_margin = 0.5\n",
        )
        .unwrap();
        assert_eq!(options.max_results, 5);
        assert!(!options.matching.enable_fuzzy_tier);
        assert_eq!(options.matching.alignment_margin, 0.5);
        assert_eq!(options.min_confidence, 0.3);
        assert_eq!(options.matching.min_block_len, 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SearchOptions::from_toml_str("min_confidence = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "min_confidence", .. }));

        let err = SearchOptions::from_toml_str("max_results = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_results", .. }));

        let err = SearchOptions::from_toml_str("fuzzy_acceptance_threshold = 170.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "fuzzy_acceptance_threshold", .. }));

        let options = SearchOptions {
            matching: MatchOptions { min_block_len: 0, ..MatchOptions::default() },
            ..SearchOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_alignment_margin_capped() {
        assert!(SearchOptions::from_toml_str("alignment_margin = 10.0").is_ok());
        for value in ["1e20", "10.5", "-0.1", "nan", "inf"] {
            let err = SearchOptions::from_toml_str(&format!("alignment_margin = {value}")).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "alignment_margin", .. }),
                "{value} accepted"
            );
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = SearchOptions::from_toml_str("max_results = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_confidence = 0.6\nenable_word_coverage_filter = true").unwrap();
        let options = SearchOptions::load_from_path(file.path()).unwrap();
        assert_eq!(options.min_confidence, 0.6);
        assert!(options.enable_word_coverage_filter);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SearchOptions::load_from_path(Path::new("/nonexistent/versefind.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
