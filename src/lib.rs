//! Bible Reader - Bible reading plan text store
//!
//! Downloads the Bible corpus once, caches it in a local SQLite database,
//! and serves verse, chapter, book and search lookups from memory.

pub mod books;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod downloader;
pub mod error;
pub mod loading;
pub mod plan;
pub mod store;

pub use books::{book_info, display_name, is_known, BookInfo, Testament, BOOKS};
pub use cache::{CacheRecordInfo, CorpusCache};
pub use config::{get_data_dir, StoreConfig, DEFAULT_SOURCE_URL};
pub use corpus::{Book, BookId, Chapter, Corpus, SearchResult};
pub use error::{FetchFailure, Location, TextStoreError};
pub use loading::{LoadingState, LoadingStateMachine, Stage, TransitionError};
pub use plan::{load_range, BibleRange, ChapterText, DailyReading, ReadingPlan};
pub use store::{InitializeOptions, ProgressCallback, TextStore};
