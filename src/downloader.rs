//! Remote corpus download
//!
//! One GET of the corpus JSON document, streamed so byte progress can be
//! reported while the body arrives. Parsing is a separate step so callers
//! can report it as its own stage.

use crate::corpus::Corpus;
use crate::error::{FetchFailure, Result, TextStoreError};
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

/// Report at least this often when the server sends no Content-Length
const UNKNOWN_LENGTH_REPORT_BYTES: u64 = 1024 * 1024;

/// Upper bound on the buffer reserved from a server's Content-Length
const MAX_PREALLOC_BYTES: u64 = 32 * 1024 * 1024;

/// Byte progress of the body download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    pub fn percent(&self) -> Option<u8> {
        match self.total_bytes {
            Some(0) => Some(100),
            Some(total) => Some(((self.bytes_downloaded.min(total) * 100) / total) as u8),
            None => None,
        }
    }

    pub fn message(&self) -> String {
        match self.percent() {
            Some(pct) => format!("Downloading Bible data... {}%", pct),
            None => format!("Downloading Bible data... {} KB", self.bytes_downloaded / 1024),
        }
    }
}

pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TextStoreError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch the raw corpus document.
    ///
    /// Any non-2xx status is a failure; `on_progress` is called as the body
    /// streams in.
    pub async fn fetch_body(
        &self,
        url: &str,
        mut on_progress: impl FnMut(DownloadProgress),
    ) -> Result<Vec<u8>> {
        info!(url, "downloading corpus");

        let response = self.client.get(url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TextStoreError::FetchFailed(FetchFailure::Status(status.as_u16())));
        }

        let total_bytes = response.content_length();
        let mut body = Vec::with_capacity(initial_capacity(total_bytes));
        let mut progress = DownloadProgress { bytes_downloaded: 0, total_bytes };
        let mut last_percent = None;
        let mut last_reported = 0u64;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(fetch_error)?;
            body.extend_from_slice(&chunk);
            progress.bytes_downloaded += chunk.len() as u64;

            let report = match progress.percent() {
                Some(pct) => last_percent != Some(pct),
                None => progress.bytes_downloaded - last_reported >= UNKNOWN_LENGTH_REPORT_BYTES,
            };
            if report {
                last_percent = progress.percent();
                last_reported = progress.bytes_downloaded;
                on_progress(progress);
            }
        }

        debug!(bytes = body.len(), "corpus download finished");
        Ok(body)
    }
}

/// Parse a downloaded document into a corpus.
pub fn parse_corpus(body: &[u8]) -> Result<Corpus> {
    let corpus: Corpus = serde_json::from_slice(body)
        .map_err(|e| TextStoreError::FetchFailed(FetchFailure::Parse(e.to_string())))?;

    if !corpus.is_usable() {
        return Err(TextStoreError::FetchFailed(FetchFailure::Parse(
            "corpus contains no verses".to_string(),
        )));
    }

    Ok(corpus)
}

/// Content-Length is only a hint; the body grows past the cap as needed
fn initial_capacity(total_bytes: Option<u64>) -> usize {
    total_bytes.map(|n| n.min(MAX_PREALLOC_BYTES)).unwrap_or(0) as usize
}

fn fetch_error(e: reqwest::Error) -> TextStoreError {
    if e.is_timeout() {
        TextStoreError::FetchFailed(FetchFailure::Timeout)
    } else {
        TextStoreError::FetchFailed(FetchFailure::Network(e.to_string()))
    }
}
