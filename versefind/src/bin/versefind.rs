//! Command-line verse lookup.
//!
//! Usage:
//!     versefind --corpus verses.csv "sarva-dharman parityajya"
//!     versefind --corpus verses.csv --json --max-results 5 rama rama
//!     versefind --corpus verses.csv --sources
//!
//! Logging goes to stderr and is controlled with RUST_LOG (default `warn`).

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use versefind::labels::format_source_and_author;
use versefind::{CitedItem, HighlightedLine, SearchOptions, VerseFinderApi, VerseMatch, VerseStore};

const NOT_AVAILABLE: &str = "NOT AVAILABLE";

/// versefind - find where a remembered Sanskrit fragment occurs
#[derive(Parser, Debug)]
#[command(name = "versefind", version, about, long_about = None)]
struct Cli {
    /// Corpus CSV file (needs an "IAST Verse" column)
    #[arg(long, short = 'c')]
    corpus: PathBuf,

    /// TOML options file. Without it, .versefindrc.toml or
    /// ~/.config/versefind/config.toml is used when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    max_results: Option<usize>,

    /// Minimum confidence (0-1) a verse needs to be shown
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Disable the fuzzy tier; only exact, prefix, substring and
    /// longest-block matches are scored
    #[arg(long)]
    no_fuzzy: bool,

    /// Drop verses whose highlight spans more words than the query has
    #[arg(long)]
    word_coverage: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Mark highlights with [brackets] instead of terminal colors
    #[arg(long)]
    plain: bool,

    /// List the sources verses are cited in, then exit
    #[arg(long)]
    sources: bool,

    /// Fragment to look for
    query: Vec<String>,
}

impl Cli {
    fn search_options(&self) -> Result<SearchOptions> {
        let mut options = match &self.config {
            Some(path) => SearchOptions::load_from_path(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SearchOptions::discover().context("Failed to load config")?,
        };
        if let Some(max_results) = self.max_results {
            options.max_results = max_results;
        }
        if let Some(min_confidence) = self.min_confidence {
            options.min_confidence = min_confidence;
        }
        if self.no_fuzzy {
            options.matching.enable_fuzzy_tier = false;
        }
        if self.word_coverage {
            options.enable_word_coverage_filter = true;
        }
        options.validate().context("Invalid search options")?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.plain {
        colored::control::set_override(false);
    }

    let options = cli.search_options()?;
    let store = VerseStore::open(&cli.corpus, options)
        .with_context(|| format!("Failed to load corpus {}", cli.corpus.display()))?;

    if cli.sources {
        print_sources(&store.cited_sources(), cli.json)?;
        return Ok(());
    }

    let query = cli.query.join(" ");
    if query.trim().is_empty() {
        bail!("No query given");
    }

    let result = store.search(query.clone()).await.context("Search failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.matches.is_empty() {
        println!("{} No verses found for: {}", "✗".red(), query.yellow());
        return Ok(());
    }

    println!(
        "{} {} of {} matching verses ({} in corpus)",
        "✓".green(),
        result.matches.len(),
        result.total_count,
        store.verse_count()
    );
    for (rank, m) in result.matches.iter().enumerate() {
        print_match(rank + 1, m, cli.plain);
    }
    Ok(())
}

fn print_match(rank: usize, m: &VerseMatch, plain: bool) {
    println!();
    println!(
        "{} {}",
        format!("#{rank}").bold(),
        format!("{:.1}%", m.score_percent).cyan()
    );
    for line in &m.lines {
        println!("    {}", render_line(line, plain));
    }

    let record = &m.verse;
    let source = format_source_and_author(&record.original_source, &record.author);
    println!("  {} {}", "Source:".dimmed(), source.as_deref().unwrap_or(NOT_AVAILABLE));

    let cited = if record.cited_in.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        cited_label(&CitedItem::parse(&record.cited_in))
    };
    println!("  {} {}", "Cited in:".dimmed(), cited);

    let translation = if record.translation.is_empty() {
        NOT_AVAILABLE
    } else {
        record.translation.as_str()
    };
    println!("  {} {}", "Translation:".dimmed(), translation);
}

fn render_line(line: &HighlightedLine, plain: bool) -> String {
    line.runs
        .iter()
        .map(|run| match (run.highlighted, plain) {
            (false, _) => run.text.clone(),
            (true, true) => format!("[{}]", run.text),
            (true, false) => run.text.yellow().bold().to_string(),
        })
        .collect()
}

fn cited_label(item: &CitedItem) -> String {
    match &item.author {
        Some(author) => format!("{} (by {})", item.title, author),
        None => item.title.clone(),
    }
}

fn print_sources(sources: &[CitedItem], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(sources)?);
        return Ok(());
    }
    for item in sources {
        println!("{}", cited_label(item));
    }
    Ok(())
}
