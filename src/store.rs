//! The Bible text store
//!
//! `TextStore` owns the corpus. `initialize()` loads it once, from the local
//! cache when possible and from the remote endpoint otherwise, publishing
//! each step to the store's `LoadingStateMachine`. After that every lookup is
//! a synchronous read of the immutable in-memory corpus.

use crate::cache::{CacheRecordInfo, CorpusCache};
use crate::config::StoreConfig;
use crate::corpus::{Book, Chapter, Corpus, SearchResult};
use crate::downloader::{parse_corpus, Downloader};
use crate::error::{Result, TextStoreError};
use crate::loading::{LoadingStateMachine, Stage};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Called with each accepted stage change, in order, never after `complete`
pub type ProgressCallback = Arc<dyn Fn(Stage, &str) + Send + Sync>;

/// Per-call overrides; unset fields fall back to the store's `StoreConfig`
#[derive(Clone, Default)]
pub struct InitializeOptions {
    pub source_url: Option<String>,
    pub use_cache: Option<bool>,
    pub on_progress: Option<ProgressCallback>,
}

impl InitializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    pub fn on_progress(mut self, f: impl Fn(Stage, &str) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for InitializeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializeOptions")
            .field("source_url", &self.source_url)
            .field("use_cache", &self.use_cache)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

pub struct TextStore {
    config: StoreConfig,
    cache: Arc<CorpusCache>,
    downloader: Downloader,
    loading: LoadingStateMachine,
    corpus: OnceLock<Arc<Corpus>>,
    /// Serializes initialize sequences and cache writes
    init_lock: Mutex<()>,
}

impl TextStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let downloader = Downloader::new(config.fetch_timeout)?;
        let cache = Arc::new(CorpusCache::new(config.cache_db_path()));
        Ok(Self {
            config,
            cache,
            downloader,
            loading: LoadingStateMachine::new(),
            corpus: OnceLock::new(),
            init_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn loading(&self) -> &LoadingStateMachine {
        &self.loading
    }

    pub fn is_initialized(&self) -> bool {
        self.corpus.get().is_some()
    }

    /// Load the corpus. A no-op once it has succeeded.
    ///
    /// Concurrent callers wait for the sequence already running and then
    /// return without fetching again. On failure the store stays
    /// uninitialized and a later call starts over.
    pub async fn initialize(&self, options: InitializeOptions) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let _guard = self.init_lock.lock().await;
        if self.is_initialized() {
            debug!("corpus initialized by a concurrent call");
            return Ok(());
        }
        self.loading.begin_cycle();

        let use_cache = options.use_cache.unwrap_or(self.config.use_cache);
        let source_url = options
            .source_url
            .clone()
            .unwrap_or_else(|| self.config.source_url.clone());

        if use_cache {
            self.report(&options, Stage::CheckingCache, "Checking local cache...");
            match self.load_cached().await {
                Ok(Some(corpus)) => {
                    info!(verses = corpus.verse_count(), "loaded corpus from cache");
                    self.adopt(Arc::new(corpus));
                    self.report(&options, Stage::Complete, "Bible loaded from cache");
                    return Ok(());
                }
                Ok(None) => debug!("corpus cache miss"),
                Err(e) => warn!(error = %e, "cache read failed, falling back to download"),
            }
        }

        self.report(&options, Stage::Downloading, "Downloading Bible data...");
        let body = self
            .downloader
            .fetch_body(&source_url, |progress| {
                self.report(&options, Stage::Downloading, &progress.message())
            })
            .await?;

        self.report(&options, Stage::Initializing, "Initializing data...");
        let corpus = Arc::new(parse_corpus(&body)?);

        if use_cache {
            self.report(&options, Stage::Initializing, "Saving cache...");
            if let Err(e) = self.store_cached(Arc::clone(&corpus)).await {
                warn!(error = %e, "failed to write corpus cache, continuing from memory");
            }
        }

        info!(verses = corpus.verse_count(), "corpus initialized");
        self.adopt(corpus);
        self.report(&options, Stage::Complete, "Bible loaded");
        Ok(())
    }

    pub fn corpus(&self) -> Result<&Corpus> {
        self.corpus
            .get()
            .map(|c| c.as_ref())
            .ok_or(TextStoreError::NotInitialized)
    }

    pub fn get_verse(&self, book: &str, chapter: &str, verse: &str) -> Result<&str> {
        self.corpus()?.verse(book, chapter, verse)
    }

    pub fn get_chapter(&self, book: &str, chapter: &str) -> Result<&Chapter> {
        self.corpus()?.chapter(book, chapter)
    }

    pub fn get_book(&self, book: &str) -> Result<&Book> {
        self.corpus()?.book(book)
    }

    /// Every verse containing `query` literally, in corpus order.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        Ok(self.corpus()?.search(query))
    }

    /// Delete the persisted record. The in-memory corpus is untouched.
    pub async fn clear_cache(&self) -> Result<bool> {
        let _guard = self.init_lock.lock().await;
        let cache = Arc::clone(&self.cache);
        run_blocking(move || cache.clear()).await
    }

    pub async fn cache_info(&self) -> Result<Option<CacheRecordInfo>> {
        let cache = Arc::clone(&self.cache);
        run_blocking(move || cache.record_info()).await
    }

    async fn load_cached(&self) -> Result<Option<Corpus>> {
        let cache = Arc::clone(&self.cache);
        run_blocking(move || cache.load()).await
    }

    async fn store_cached(&self, corpus: Arc<Corpus>) -> Result<()> {
        let cache = Arc::clone(&self.cache);
        run_blocking(move || cache.store(&corpus)).await
    }

    fn adopt(&self, corpus: Arc<Corpus>) {
        // set only fails if already set, which init_lock rules out
        let _ = self.corpus.set(corpus);
    }

    fn report(&self, options: &InitializeOptions, stage: Stage, message: &str) {
        if let Err(e) = self.loading.transition(stage, message) {
            warn!(error = %e, "ignored loading transition");
            return;
        }
        if let Some(callback) = &options.on_progress {
            callback(stage, message);
        }
    }
}

/// SQLite work runs off the async worker threads
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TextStoreError::CacheAccessFailed(format!("cache task failed: {}", e)))?
}
