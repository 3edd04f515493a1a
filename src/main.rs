//! Bible Reader - command line front end
//!
//! Composition root: resolves configuration, builds the single `TextStore`,
//! renders loading progress and runs one lookup command.

use anyhow::{bail, Context, Result};
use bible_reader_lib::{
    display_name, is_known, load_range, InitializeOptions, ReadingPlan, Stage, StoreConfig,
    TextStore, TextStoreError, BOOKS,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bible-reader", version, about = "Read and search the Bible from a local cache")]
struct Cli {
    /// Directory holding the cache database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Corpus JSON endpoint
    #[arg(long, global = true)]
    source_url: Option<String>,

    /// Skip the local cache and always download
    #[arg(long, global = true)]
    no_cache: bool,

    /// Download timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the known book codes
    Books,
    /// Delete the cached corpus
    ClearCache,
    #[command(flatten)]
    Lookup(Lookup),
}

/// Commands that need the corpus loaded
#[derive(Subcommand, Debug)]
enum Lookup {
    /// Print one verse, e.g. `verse 요 3 16`
    Verse { book: String, chapter: String, verse: String },
    /// Print a whole chapter
    Chapter { book: String, chapter: String },
    /// List a book's chapters with verse counts
    Book { book: String },
    /// Find verses containing the text
    Search { query: String },
    /// Show the reading for a date from a plan file
    Plan {
        file: PathBuf,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = StoreConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(url) = cli.source_url {
        config.source_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.fetch_timeout = Duration::from_secs(secs);
    }
    if cli.no_cache {
        config.use_cache = false;
    }

    match cli.command {
        Command::Books => {
            for book in BOOKS.iter() {
                println!("{}\t{}", book.code, book.name);
            }
            Ok(())
        }
        Command::ClearCache => {
            let store = TextStore::new(config)?;
            if store.clear_cache().await? {
                println!("Cache cleared: {}", store.config().cache_db_path().display());
            } else {
                println!("No cached corpus");
            }
            Ok(())
        }
        Command::Lookup(lookup) => {
            let store = TextStore::new(config)?;
            initialize_with_progress(&store).await?;
            run_lookup(&store, lookup)
        }
    }
}

fn run_lookup(store: &TextStore, lookup: Lookup) -> Result<()> {
    match lookup {
        Lookup::Verse { book, chapter, verse } => {
            let text = store
                .get_verse(&book, &chapter, &verse)
                .map_err(|e| explain_miss(e, &book))?;
            println!("{} {}:{} {}", book_label(&book), chapter, verse, text);
        }
        Lookup::Chapter { book, chapter } => {
            let found = store.get_chapter(&book, &chapter).map_err(|e| explain_miss(e, &book))?;
            println!("{} {}장", book_label(&book), chapter);
            for (verse, text) in found.sorted_verses() {
                println!("{:>3} {}", verse, text);
            }
        }
        Lookup::Book { book } => {
            let found = store.get_book(&book).map_err(|e| explain_miss(e, &book))?;
            println!("{} ({} chapters)", book_label(&book), found.chapters.len());
            for (chapter, content) in found.sorted_chapters() {
                println!("{:>3}장  {} verses", chapter, content.verses.len());
            }
        }
        Lookup::Search { query } => {
            let results = store.search(&query)?;
            for hit in &results {
                println!("{} {}:{} {}", book_label(&hit.book), hit.chapter, hit.verse, hit.text);
            }
            println!("{} result(s)", results.len());
        }
        Lookup::Plan { file, date } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read plan file {:?}", file))?;
            let plan: ReadingPlan = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse plan file {:?}", file))?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            let Some(reading) = plan.reading_for_date(date) else {
                bail!("{} has no reading for {}", plan.name, date);
            };
            println!("{} - {}", date, reading.label());
            for range in &reading.ranges {
                for chapter in load_range(store, range)? {
                    println!();
                    println!("{} {}장", book_label(&chapter.book), chapter.chapter);
                    for verse in &chapter.verses {
                        println!("{:>3} {}", verse.verse, verse.text);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Initialize the store while a watcher prints each stage change.
async fn initialize_with_progress(store: &TextStore) -> Result<()> {
    let mut rx = store.loading().subscribe();
    let watcher = tokio::spawn(async move {
        loop {
            {
                let state = rx.borrow_and_update();
                if state.stage != Stage::Idle {
                    eprintln!("[{}] {}", state.stage, state.message);
                }
                if state.stage == Stage::Complete {
                    break;
                }
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    match store.initialize(InitializeOptions::new()).await {
        Ok(()) => {
            let _ = watcher.await;
            Ok(())
        }
        Err(e) => {
            watcher.abort();
            Err(e).context("Failed to load Bible text")
        }
    }
}

fn book_label(code: &str) -> &str {
    display_name(code).unwrap_or(code)
}

/// Point at the catalog when a lookup missed because the book code is unknown
fn explain_miss(err: TextStoreError, book: &str) -> anyhow::Error {
    if err.is_not_found() && !is_known(book) {
        anyhow::anyhow!("{}; {:?} is not a book code, see `bible-reader books`", err, book)
    } else {
        err.into()
    }
}
