//! VerseStore - main API over an in-memory verse corpus.
//!
//! Async Cancellation Architecture:
//! A caller that stops awaiting a search drops its future. We intercept this
//! via a DropGuard that triggers a CancellationToken. The blocking ranking
//! thread checks this token between verses and aborts mid-flight.

use crate::align::resolve_highlights;
use crate::candidate::Corpus;
use crate::config::SearchOptions;
use crate::highlight::render;
use crate::interface::{SearchResult, VerseFinderApi, VerseFinderError, VerseMatch};
use crate::labels::CitedItem;
use crate::loader;
use crate::models::VerseRecord;
use crate::normalize::normalize;
use crate::ranking::{rank_corpus, RankedVerse};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::{Arc, Once};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Global fallback Tokio runtime for when async functions are called outside any runtime context.
/// Shared across all VerseStore instances and never dropped.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

static RAYON_INIT: Once = Once::new();

/// Initialize global Rayon thread pool with core reservation and lower priority
fn init_rayon() {
    RAYON_INIT.call_once(|| {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        // Reserve 2 cores for Tokio, but use at least 1 thread.
        let rayon_threads = num_threads.saturating_sub(2).max(1);

        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(rayon_threads)
            .thread_name(|i| format!("versefind-rayon-{}", i))
            .start_handler(|_| {
                use thread_priority::*;
                let _ = set_current_thread_priority(ThreadPriority::Min);
            })
            .build_global();
    });
}

/// RAII guard that cancels a token when dropped.
/// Dropping a search future drops this guard, which triggers the token.
struct DropGuard {
    token: CancellationToken,
}

impl DropGuard {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Thread-safe verse store
///
/// Concurrency Model:
/// - The corpus is immutable and shared behind an `Arc`
/// - Search is async with cancellation support via CancellationToken
/// - Blocking work runs on tokio::spawn_blocking threads, fanned out over rayon
/// - Uses global FALLBACK_RUNTIME when called outside any runtime
pub struct VerseStore {
    corpus: Arc<Corpus>,
    options: SearchOptions,
}

impl VerseStore {
    /// Build a store over already loaded records.
    pub fn new(records: Vec<VerseRecord>, options: SearchOptions) -> Result<Self, VerseFinderError> {
        options.validate()?;
        init_rayon();
        Ok(Self {
            corpus: Arc::new(Corpus::from_records(records)),
            options,
        })
    }

    /// Load a CSV corpus from disk.
    pub fn open(path: &Path, options: SearchOptions) -> Result<Self, VerseFinderError> {
        let records = loader::load_from_path(path)?;
        Self::new(records, options)
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Get a tokio runtime handle - uses current runtime if available, otherwise global fallback
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current()
            .unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }

    /// Rank and render synchronously. Checks `token` between verses.
    pub(crate) fn search_sync(
        corpus: &Corpus,
        query: &str,
        options: &SearchOptions,
        token: &CancellationToken,
    ) -> Result<SearchResult, VerseFinderError> {
        let start = Instant::now();
        let ranking = rank_corpus(query, corpus, options, token)?;
        let ranked_at = start.elapsed();

        if token.is_cancelled() {
            return Err(VerseFinderError::Cancelled);
        }

        let normalized: Vec<char> = normalize(query).chars().collect();
        let matches: Vec<VerseMatch> = ranking
            .verses
            .iter()
            .map(|ranked| to_verse_match(&normalized, ranked, options))
            .collect();

        debug!(
            query,
            verses = corpus.len(),
            total = ranking.total_count,
            returned = matches.len(),
            rank_ms = ranked_at.as_secs_f64() * 1000.0,
            total_ms = start.elapsed().as_secs_f64() * 1000.0,
            "search complete"
        );

        Ok(SearchResult {
            query: query.to_string(),
            matches,
            total_count: ranking.total_count as u64,
        })
    }
}

/// Attach highlighted display lines to a ranked verse.
fn to_verse_match(query: &[char], ranked: &RankedVerse<'_>, options: &SearchOptions) -> VerseMatch {
    let verse = ranked.verse;
    let set = resolve_highlights(query, verse.display_text(), verse.lines(), &options.matching);
    let fragment = ranked.fragment;
    VerseMatch {
        verse: verse.record().clone(),
        corpus_index: ranked.index as u64,
        confidence: fragment.confidence,
        score_percent: fragment.confidence * 100.0,
        position: fragment.position.map(|p| p as u64),
        prefix_length: fragment.prefix_length as u64,
        kind: fragment.kind,
        lines: render(verse.lines(), &set),
    }
}

#[async_trait::async_trait]
impl VerseFinderApi for VerseStore {
    async fn search(&self, query: String) -> Result<SearchResult, VerseFinderError> {
        self.search_with_options(query, self.options.clone()).await
    }

    async fn search_with_options(
        &self,
        query: String,
        options: SearchOptions,
    ) -> Result<SearchResult, VerseFinderError> {
        self.search_cancellable(query, options, CancellationToken::new()).await
    }

    fn verse_count(&self) -> u64 {
        self.corpus.len() as u64
    }

    fn cited_sources(&self) -> Vec<CitedItem> {
        self.corpus
            .cited_sources()
            .iter()
            .map(|c| CitedItem::parse(c))
            .collect()
    }
}

impl VerseStore {
    /// Async search bound to `token`. When the caller drops the future, the
    /// DropGuard triggers the token and the ranking scan stops early.
    pub(crate) async fn search_cancellable(
        &self,
        query: String,
        options: SearchOptions,
        token: CancellationToken,
    ) -> Result<SearchResult, VerseFinderError> {
        if normalize(&query).is_empty() {
            return Err(VerseFinderError::InvalidInput("Query has no searchable characters".into()));
        }
        options.validate()?;

        let _guard = DropGuard::new(token.clone());

        let runtime = self.runtime_handle();
        let corpus = Arc::clone(&self.corpus);
        let token_clone = token.clone();

        // runtime.spawn_blocking works even when the caller has no runtime context
        let handle = runtime.spawn_blocking(move || {
            Self::search_sync(&corpus, query.trim(), &options, &token_clone)
        });

        match handle.await {
            Ok(result) => result,
            Err(_join_error) => Err(VerseFinderError::Cancelled),
        }
    }
}
