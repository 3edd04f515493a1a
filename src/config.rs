//! Store configuration and data directory resolution

use crate::error::{Result, TextStoreError};
use std::path::PathBuf;
use std::time::Duration;

/// Remote endpoint serving the full corpus JSON
pub const DEFAULT_SOURCE_URL: &str = "https://hb-read-bible.web.app/bible.json";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

const APP_DIR_NAME: &str = "bible-reader";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the cache database
    pub data_dir: PathBuf,
    pub source_url: String,
    pub fetch_timeout: Duration,
    pub use_cache: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            use_cache: true,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `BIBLE_DATA_DIR`, `BIBLE_SOURCE_URL`,
    /// `BIBLE_FETCH_TIMEOUT_SECS` and `BIBLE_USE_CACHE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("BIBLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("BIBLE_SOURCE_URL") {
            config.source_url = url;
        }
        if let Some(secs) = lookup("BIBLE_FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                TextStoreError::Config(format!("BIBLE_FETCH_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = lookup("BIBLE_USE_CACHE") {
            config.use_cache = parse_bool(&flag).ok_or_else(|| {
                TextStoreError::Config(format!("BIBLE_USE_CACHE is not a boolean: {}", flag))
            })?;
        }

        Ok(config)
    }

    pub fn cache_db_path(&self) -> PathBuf {
        self.data_dir.join(crate::cache::DB_FILE_NAME)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get the data directory
///
/// Platform data dir (e.g. `~/.local/share/bible-reader`), falling back to
/// `./data` when the platform has none.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.fetch_timeout, Duration::from_secs(60));
        assert!(config.use_cache);
        assert!(config.cache_db_path().ends_with("bible.db"));
    }

    #[test]
    fn test_env_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("BIBLE_DATA_DIR", "/tmp/bible"),
            ("BIBLE_SOURCE_URL", "http://localhost:8080/bible.json"),
            ("BIBLE_FETCH_TIMEOUT_SECS", "5"),
            ("BIBLE_USE_CACHE", "off"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/bible"));
        assert_eq!(config.source_url, "http://localhost:8080/bible.json");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert!(!config.use_cache);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[("BIBLE_FETCH_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, TextStoreError::Config(_)));
        let err = StoreConfig::from_lookup(lookup(&[("BIBLE_USE_CACHE", "maybe")])).unwrap_err();
        assert!(matches!(err, TextStoreError::Config(_)));
    }
}
