//! CSV corpus loading.
//!
//! Corpus exports come from spreadsheets saved either with `,` or `;` as the
//! separator, sometimes with a UTF-8 byte order mark. Only the `IAST Verse`
//! column is required.

use crate::models::VerseRecord;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const VERSE_COLUMN: &str = "IAST Verse";
pub const SOURCE_COLUMN: &str = "Original Source";
pub const AUTHOR_COLUMN: &str = "Author";
pub const CONTEXT_COLUMN: &str = "Context";
pub const TRANSLATION_COLUMN: &str = "English Translation";
pub const CITED_IN_COLUMN: &str = "Cited In";

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),
    #[error("unsupported corpus format: {0} (export the sheet as CSV)")]
    UnsupportedFormat(String),
}

/// `,` unless the text has more semicolons than commas.
pub fn detect_delimiter(text: &str) -> u8 {
    let commas = text.matches(',').count();
    let semicolons = text.matches(';').count();
    if commas >= semicolons {
        b','
    } else {
        b';'
    }
}

/// Column positions resolved from the header row.
struct Columns {
    verse: usize,
    source: Option<usize>,
    author: Option<usize>,
    context: Option<usize>,
    translation: Option<usize>,
    cited_in: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoaderError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Ok(Self {
            verse: find(VERSE_COLUMN).ok_or(LoaderError::MissingColumn(VERSE_COLUMN))?,
            source: find(SOURCE_COLUMN),
            author: find(AUTHOR_COLUMN),
            context: find(CONTEXT_COLUMN),
            translation: find(TRANSLATION_COLUMN),
            cited_in: find(CITED_IN_COLUMN),
        })
    }

    fn record(&self, row: &csv::StringRecord) -> VerseRecord {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        VerseRecord {
            iast_verse: field(Some(self.verse)),
            original_source: field(self.source),
            author: field(self.author),
            context: field(self.context),
            translation: field(self.translation),
            cited_in: field(self.cited_in),
        }
    }
}

/// Parse corpus CSV text. Rows with an empty verse are skipped.
pub fn load_from_str(text: &str) -> Result<Vec<VerseRecord>, LoaderError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(text))
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let record = columns.record(&row?);
        if record.iast_verse.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    if skipped > 0 {
        warn!(skipped, "skipped rows without a verse");
    }
    Ok(records)
}

/// Load a corpus file. Spreadsheet workbooks are rejected.
pub fn load_from_path(path: &Path) -> Result<Vec<VerseRecord>, LoaderError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if matches!(extension.as_deref(), Some("xlsx") | Some("xls")) {
        return Err(LoaderError::UnsupportedFormat(path.display().to_string()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records = load_from_str(&text)?;
    info!(path = %path.display(), verses = records.len(), "loaded corpus");
    Ok(records)
}
