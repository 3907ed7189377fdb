//! HTTP download functionality
//!
//! Handles downloading component archives with progress reporting, checksum
//! verification, retry with exponential backoff, and zip extraction.

use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use crate::config::defaults;
use crate::error::DownloadError;

/// Progress callback type for download progress reporting
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// A downloaded payload held in memory
#[derive(Debug)]
pub struct DownloadResult {
    /// Raw bytes
    pub content: Vec<u8>,
    /// SHA256 checksum of the content
    pub checksum: String,
}

/// Download manager for fetching archives with retry support
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
    max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds)
    base_delay_ms: u64,
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

impl DownloadManager {
    /// Create a new download manager
    pub fn new() -> Self {
        Self::with_config(defaults::MAX_DOWNLOAD_RETRIES, 1000)
    }

    /// Create a download manager with custom settings
    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            client: build_client(),
            max_retries: max_retries.max(1),
            base_delay_ms,
        }
    }

    /// Get max retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Download a URL into memory, retrying failed attempts
    pub async fn download(
        &self,
        url: &str,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let mut attempts = 0;
        let mut last_error = None;
        let mut delay_ms = self.base_delay_ms;

        while attempts < self.max_retries {
            attempts += 1;

            match self.download_once(url, progress).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::debug!("Download attempt {attempts} for {url} failed: {e}");
                    last_error = Some(e);

                    if attempts < self.max_retries {
                        // Exponential backoff with cap at 30 seconds
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(30_000);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DownloadError::MaxRetriesExceeded {
            url: url.to_string(),
            retries: self.max_retries,
        }))
    }

    async fn download_once(
        &self,
        url: &str,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::NetworkError {
                url: url.to_string(),
                error: format!("HTTP {}", response.status()),
            });
        }

        let total_size = response.content_length().unwrap_or(0);
        let mut hasher = Sha256::new();
        let mut content = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::NetworkError {
                url: url.to_string(),
                error: e.to_string(),
            })?;

            hasher.update(&chunk);
            content.extend_from_slice(&chunk);

            if let Some(cb) = progress {
                cb(content.len() as u64, total_size);
            }
        }

        Ok(DownloadResult {
            content,
            checksum: hex::encode(hasher.finalize()),
        })
    }

    /// Download a URL and verify its SHA256 checksum
    pub async fn download_verified(
        &self,
        name: &str,
        url: &str,
        expected_checksum: &str,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let result = self.download(url, progress).await?;

        tracing::debug!("file_hash: {}", result.checksum);
        tracing::debug!("check_sum: {expected_checksum}");

        if !result.checksum.eq_ignore_ascii_case(expected_checksum) {
            return Err(DownloadError::ChecksumMismatch {
                name: name.to_string(),
                expected: expected_checksum.to_lowercase(),
                actual: result.checksum,
            });
        }

        Ok(result)
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Extract a zip archive held in memory into `dest`
pub fn extract_zip(content: &[u8], dest: &Path) -> Result<(), DownloadError> {
    let extract_err = |e: &dyn std::fmt::Display| DownloadError::Extract {
        path: dest.to_path_buf(),
        error: e.to_string(),
    };

    std::fs::create_dir_all(dest).map_err(|e| extract_err(&e))?;
    let mut archive = zip::ZipArchive::new(Cursor::new(content)).map_err(|e| extract_err(&e))?;
    archive.extract(dest).map_err(|e| extract_err(&e))
}
