//! Persistent corpus cache backed by SQLite
//!
//! The whole corpus is stored as a single record: table `bible`, key
//! `bibleData`, in `bible.db` under the data directory. Each row carries a
//! schema version and a SHA-256 checksum of the stored JSON so a stale or
//! damaged record reads as a miss instead of a bad corpus.

use crate::corpus::Corpus;
use crate::error::{Result, TextStoreError};
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DB_FILE_NAME: &str = "bible.db";
pub const RECORD_KEY: &str = "bibleData";
/// Bump when the stored value shape changes
pub const SCHEMA_VERSION: i64 = 1;

pub struct CorpusCache {
    db_path: PathBuf,
}

/// Metadata of the stored record, without the corpus itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecordInfo {
    pub schema_version: i64,
    pub saved_at: String,
    pub size_bytes: usize,
}

impl CorpusCache {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open-or-create the database and its single table
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TextStoreError::CacheAccessFailed(format!(
                    "Failed to create cache directory {:?}: {}",
                    parent, e
                ))
            })?;
        }

        let conn = Connection::open(&self.db_path).map_err(|e| {
            TextStoreError::CacheAccessFailed(format!(
                "Failed to open cache at {:?}: {}",
                self.db_path, e
            ))
        })?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS bible (
                key TEXT PRIMARY KEY,
                schema_version INTEGER NOT NULL,
                saved_at TEXT NOT NULL,
                checksum TEXT NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(conn)
    }

    /// Read the cached corpus.
    ///
    /// `Ok(None)` for a missing record and for one that fails validation;
    /// `Err` only when the database itself cannot be used.
    pub fn load(&self) -> Result<Option<Corpus>> {
        let conn = self.open()?;

        let row: Option<(i64, String, String)> = conn
            .query_row(
                "SELECT schema_version, checksum, value FROM bible WHERE key = ?1",
                rusqlite::params![RECORD_KEY],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let (schema_version, checksum, value) = match row {
            Some(row) => row,
            None => {
                debug!(path = ?self.db_path, "no cached corpus record");
                return Ok(None);
            }
        };

        if schema_version != SCHEMA_VERSION {
            warn!(
                found = schema_version,
                expected = SCHEMA_VERSION,
                "cached corpus has a different schema version, ignoring"
            );
            return Ok(None);
        }

        if !checksum_matches(&value, &checksum) {
            warn!("cached corpus checksum mismatch, ignoring");
            return Ok(None);
        }

        let corpus: Corpus = match serde_json::from_str(&value) {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!(error = %e, "cached corpus does not parse, ignoring");
                return Ok(None);
            }
        };

        if !corpus.is_usable() {
            warn!("cached corpus is empty, ignoring");
            return Ok(None);
        }

        Ok(Some(corpus))
    }

    /// Replace the record with `corpus` in a single transaction
    pub fn store(&self, corpus: &Corpus) -> Result<()> {
        let value = serde_json::to_string(corpus).map_err(|e| {
            TextStoreError::CacheAccessFailed(format!("Failed to serialize corpus: {}", e))
        })?;
        let checksum = compute_checksum(&value);
        let saved_at = chrono::Utc::now().to_rfc3339();

        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO bible (key, schema_version, saved_at, checksum, value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![RECORD_KEY, SCHEMA_VERSION, saved_at, checksum, value],
        )?;
        tx.commit()?;

        debug!(path = ?self.db_path, bytes = value.len(), "corpus cached");
        Ok(())
    }

    /// Delete the record. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        let conn = self.open()?;
        let deleted = conn.execute("DELETE FROM bible WHERE key = ?1", rusqlite::params![RECORD_KEY])?;
        Ok(deleted > 0)
    }

    pub fn record_info(&self) -> Result<Option<CacheRecordInfo>> {
        let conn = self.open()?;
        let info = conn
            .query_row(
                "SELECT schema_version, saved_at, length(CAST(value AS BLOB)) FROM bible WHERE key = ?1",
                rusqlite::params![RECORD_KEY],
                |row| {
                    Ok(CacheRecordInfo {
                        schema_version: row.get(0)?,
                        saved_at: row.get(1)?,
                        size_bytes: row.get::<_, i64>(2)? as usize,
                    })
                },
            )
            .optional()?;
        Ok(info)
    }
}

fn compute_checksum(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

fn checksum_matches(value: &str, expected: &str) -> bool {
    let expected = expected.strip_prefix("sha256:").unwrap_or(expected);
    let actual = compute_checksum(value);
    actual.strip_prefix("sha256:") == Some(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Corpus {
        serde_json::from_str(
            r#"{"books":{"요":{"chapters":{"3":{"verses":{"16":"하나님이 세상을 이처럼 사랑하사"}}}}}}"#,
        )
        .unwrap()
    }

    fn temp_cache() -> (tempfile::TempDir, CorpusCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CorpusCache::new(dir.path().join("nested").join(DB_FILE_NAME));
        (dir, cache)
    }

    #[test]
    fn test_empty_cache_is_miss() {
        let (_dir, cache) = temp_cache();
        assert!(cache.load().unwrap().is_none());
        assert!(cache.record_info().unwrap().is_none());
    }

    #[test]
    fn test_store_then_load() {
        let (_dir, cache) = temp_cache();
        cache.store(&sample()).unwrap();

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded, sample());

        let info = cache.record_info().unwrap().unwrap();
        assert_eq!(info.schema_version, SCHEMA_VERSION);
        assert!(info.size_bytes > 0);
    }

    #[test]
    fn test_store_overwrites_single_record() {
        let (_dir, cache) = temp_cache();
        cache.store(&sample()).unwrap();
        let mut other = sample();
        other.books.insert("창".into(), other.books["요"].clone());
        cache.store(&other).unwrap();

        let conn = Connection::open(cache.path()).unwrap();
        let rows: i64 = conn.query_row("SELECT COUNT(*) FROM bible", [], |r| r.get(0)).unwrap();
        assert_eq!(rows, 1);
        assert_eq!(cache.load().unwrap().unwrap().books.len(), 2);
    }

    #[test]
    fn test_schema_mismatch_is_miss() {
        let (_dir, cache) = temp_cache();
        cache.store(&sample()).unwrap();
        let conn = Connection::open(cache.path()).unwrap();
        conn.execute("UPDATE bible SET schema_version = 0", []).unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_value_is_miss() {
        let (_dir, cache) = temp_cache();
        cache.store(&sample()).unwrap();
        let conn = Connection::open(cache.path()).unwrap();
        conn.execute("UPDATE bible SET value = '{\"books\":'", []).unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let (_dir, cache) = temp_cache();
        cache.store(&sample()).unwrap();
        assert!(cache.clear().unwrap());
        assert!(!cache.clear().unwrap());
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_unopenable_path_is_access_failure() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the database file should be
        let cache = CorpusCache::new(dir.path().to_path_buf());
        assert!(matches!(cache.load(), Err(TextStoreError::CacheAccessFailed(_))));
    }
}
