//! Error types for the Bible text store

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextStoreError>;

#[derive(Error, Debug)]
pub enum TextStoreError {
    #[error("Bible text is not initialized; call initialize() first")]
    NotInitialized,

    #[error("Not found: {0}")]
    NotFound(Location),

    #[error("Fetch failed: {0}")]
    FetchFailed(FetchFailure),

    #[error("Cache access failed: {0}")]
    CacheAccessFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TextStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The lookup key that was missing from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Book { book: String },
    Chapter { book: String, chapter: String },
    Verse { book: String, chapter: String, verse: String },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Book { book } => write!(f, "book {}", book),
            Location::Chapter { book, chapter } => write!(f, "chapter {} {}", book, chapter),
            Location::Verse { book, chapter, verse } => {
                write!(f, "verse {} {}:{}", book, chapter, verse)
            }
        }
    }
}

/// Why the remote corpus could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Non-2xx response
    Status(u16),
    /// Body was not a valid corpus document
    Parse(String),
    Timeout,
    Network(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Status(code) => write!(f, "HTTP {}", code),
            FetchFailure::Parse(reason) => write!(f, "malformed corpus: {}", reason),
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::Network(reason) => write!(f, "network error: {}", reason),
        }
    }
}

impl From<rusqlite::Error> for TextStoreError {
    fn from(e: rusqlite::Error) -> Self {
        TextStoreError::CacheAccessFailed(e.to_string())
    }
}

impl serde::Serialize for TextStoreError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_missing_location() {
        let err = TextStoreError::NotFound(Location::Verse {
            book: "요".into(),
            chapter: "3".into(),
            verse: "99".into(),
        });
        assert_eq!(err.to_string(), "Not found: verse 요 3:99");
        assert!(err.is_not_found());

        let err = TextStoreError::FetchFailed(FetchFailure::Status(500));
        assert_eq!(err.to_string(), "Fetch failed: HTTP 500");
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&TextStoreError::NotInitialized).unwrap();
        assert_eq!(json, "\"Bible text is not initialized; call initialize() first\"");
    }
}
