//! Batch download engine with bounded concurrency.
//!
//! The engine drives [`download_image`] over the whole URL collection. A
//! failed image never aborts the batch; it is logged, counted, and reported
//! in [`DownloadStats::failures`].
//!
//! # Concurrency Model
//!
//! - With concurrency 1 (the default) URLs are processed strictly in order.
//! - Above 1, URLs are grouped by target file name and each group runs
//!   sequentially inside its own task, so two URLs that map to the same
//!   file never race and the skip rule behaves as it does sequentially.
//! - A semaphore permit is held per group while it runs (RAII).
//!
//! # Example
//!
//! ```no_run
//! use covers_core::download::DownloadEngine;
//! use covers_core::fetch::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let engine = DownloadEngine::new(4)?;
//! let urls = vec!["https://gameinformer.com/sites/default/files/styles/no_compression/public/a.jpg.webp".to_string()];
//! let stats = engine.run(&client, &urls, Path::new("output")).await?;
//! println!("downloaded {}, skipped {}", stats.downloaded(), stats.skipped());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::error::DownloadError;
use super::filename::filename_for_url;
use super::image::{DownloadOutcome, download_image};
use crate::fetch::HttpClient;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 32;

/// Default concurrency: one image at a time.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Callback invoked after each URL finishes, with its result.
pub type ProgressCallback =
    Arc<dyn Fn(&str, &Result<DownloadOutcome, DownloadError>) + Send + Sync>;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,

    /// A download task panicked or was cancelled.
    #[error("download task failed: {reason}")]
    Task {
        /// Join error description.
        reason: String,
    },
}

/// One image that could not be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    /// The canonical URL.
    pub url: String,
    /// Target file name, when one could be derived.
    pub filename: Option<String>,
    /// Rendered error message.
    pub error: String,
}

/// Counts from a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    downloaded: usize,
    skipped: usize,
    bytes: u64,
    failures: Vec<FailedDownload>,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of images fetched and written.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    /// Returns the number of images skipped because the file existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the number of failed images.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Returns the total number of URLs processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed()
    }

    /// Returns the bytes written across all downloaded images.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Returns failed images in input order.
    #[must_use]
    pub fn failures(&self) -> &[FailedDownload] {
        &self.failures
    }

    /// Records one result.
    pub fn record(&mut self, url: &str, result: &Result<DownloadOutcome, DownloadError>) {
        match result {
            Ok(DownloadOutcome::Downloaded { bytes, .. }) => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            Ok(DownloadOutcome::Skipped { .. }) => self.skipped += 1,
            Err(error) => self.failures.push(FailedDownload {
                url: url.to_string(),
                filename: filename_for_url(url),
                error: error.to_string(),
            }),
        }
    }
}

/// Download engine for the URL collection.
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("concurrency", &self.concurrency)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates an engine that runs at most `concurrency` downloads at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-32).
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            progress: None,
        })
    }

    /// Registers a callback invoked after each URL completes.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every URL into `output_dir`.
    ///
    /// Individual download failures do NOT cause this method to error; they
    /// are counted in the returned stats.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] or [`EngineError::Task`] if
    /// the task machinery itself fails.
    #[instrument(skip(self, client, urls), fields(count = urls.len(), output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        client: &HttpClient,
        urls: &[String],
        output_dir: &Path,
    ) -> Result<DownloadStats, EngineError> {
        let groups = if self.concurrency == 1 {
            vec![urls.iter().cloned().enumerate().collect()]
        } else {
            group_by_filename(urls)
        };
        info!(urls = urls.len(), groups = groups.len(), "starting downloads");

        let mut handles = Vec::with_capacity(groups.len());
        for group in groups {
            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let output_dir = output_dir.to_path_buf();
            let progress = self.progress.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                run_group(&client, group, &output_dir, progress.as_ref()).await
            }));
        }

        let mut results = Vec::with_capacity(urls.len());
        for handle in handles {
            let group_results = handle.await.map_err(|e| EngineError::Task {
                reason: e.to_string(),
            })?;
            results.extend(group_results);
        }
        results.sort_by_key(|(index, _, _)| *index);

        let mut stats = DownloadStats::new();
        for (_, url, result) in &results {
            stats.record(url, result);
        }

        info!(
            downloaded = stats.downloaded(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            "downloads finished"
        );
        Ok(stats)
    }
}

type IndexedResult = (usize, String, Result<DownloadOutcome, DownloadError>);

async fn run_group(
    client: &HttpClient,
    group: Vec<(usize, String)>,
    output_dir: &Path,
    progress: Option<&ProgressCallback>,
) -> Vec<IndexedResult> {
    let mut results = Vec::with_capacity(group.len());
    for (index, url) in group {
        let result = download_image(client, &url, output_dir).await;
        if let Err(error) = &result {
            let filename = filename_for_url(&url);
            warn!(
                url = %url,
                filename = filename.as_deref().unwrap_or("<none>"),
                error = %error,
                "Error downloading image"
            );
        }
        if let Some(progress) = progress {
            progress(&url, &result);
        }
        results.push((index, url, result));
    }
    results
}

/// Groups URLs by target file name, keeping first-seen group order and the
/// input order within each group. URLs without a file name get their own group.
fn group_by_filename(urls: &[String]) -> Vec<Vec<(usize, String)>> {
    let mut groups: Vec<Vec<(usize, String)>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (index, url) in urls.iter().enumerate() {
        let entry = (index, url.clone());
        match filename_for_url(url) {
            Some(name) => {
                if let Some(&group_index) = by_name.get(&name) {
                    groups[group_index].push(entry);
                } else {
                    by_name.insert(name, groups.len());
                    groups.push(vec![entry]);
                }
            }
            None => groups.push(vec![entry]),
        }
    }
    groups
}
