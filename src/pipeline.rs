//! End-to-end scrape pipeline: fetch, extract, normalize, persist, download.
//!
//! Fatal problems (listing unavailable, page structure changed, manifest or
//! output directory unwritable) surface as [`ScrapeError`]. Per-image
//! failures never do; they are counted in [`DownloadStats`].

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, EngineError, ProgressCallback,
};
use crate::extract::{GallerySelectors, StructureError, extract_gallery_links};
use crate::fetch::{DEFAULT_BASE_URL, DEFAULT_LISTING_URL, HttpClient, HttpError, HttpSettings};
use crate::manifest::{DEFAULT_MANIFEST_PATH, ManifestError, read_url_manifest, write_url_manifest};
use crate::normalize::{NormalizeReport, normalize_all};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The listing page could not be fetched.
    #[error("failed to fetch listing page: {0}")]
    Http(#[from] HttpError),

    /// The listing page no longer has the expected structure.
    #[error("unexpected listing page structure: {0}")]
    Structure(#[from] StructureError),

    /// `urls.json` could not be written or read.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The base URL is not an absolute http(s) URL with a host.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The download engine could not run.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Broad class of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network or HTTP status failure.
    Network,
    /// The listing page changed shape.
    Structure,
    /// Local filesystem or manifest problem.
    Filesystem,
    /// Invalid settings.
    Configuration,
}

impl ScrapeError {
    /// Returns the category used for user-facing hints.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(HttpError::ClientBuild { .. } | HttpError::InvalidUrl { .. })
            | Self::InvalidBaseUrl { .. }
            | Self::Engine(EngineError::InvalidConcurrency { .. }) => ErrorCategory::Configuration,
            Self::Http(_) | Self::Engine(_) => ErrorCategory::Network,
            Self::Structure(_) => ErrorCategory::Structure,
            Self::Manifest(_) | Self::OutputDir { .. } => ErrorCategory::Filesystem,
        }
    }
}

/// Which pipeline stages a run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Scrape, write the manifest, then download.
    #[default]
    Full,
    /// Scrape and write the manifest; no image downloads.
    DryRun,
    /// Skip scraping; download the URLs in an existing manifest.
    FromManifest,
}

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Listing page URL.
    pub listing_url: String,
    /// Origin for relative hrefs and canonical URLs.
    pub base_url: Url,
    /// Gallery container and anchor classes.
    pub selectors: GallerySelectors,
    /// Flat directory images are written into.
    pub output_dir: PathBuf,
    /// Location of `urls.json`.
    pub manifest_path: PathBuf,
    /// Maximum concurrent downloads.
    pub concurrency: usize,
    /// Timeouts and User-Agent.
    pub http: HttpSettings,
    /// Stages to run.
    pub mode: RunMode,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: default_base_url(),
            selectors: GallerySelectors::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            concurrency: DEFAULT_CONCURRENCY,
            http: HttpSettings::default(),
            mode: RunMode::Full,
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is a valid absolute URL")
}

/// Parses and validates a base URL: absolute, http or https, with a host.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidBaseUrl`] if the value is unusable.
pub fn parse_base_url(value: &str) -> Result<Url, ScrapeError> {
    let invalid = |reason: &str| ScrapeError::InvalidBaseUrl {
        url: value.to_string(),
        reason: reason.to_string(),
    };
    let parsed = Url::parse(value).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }
    Ok(parsed)
}

/// Result of the scrape stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOutput {
    /// Number of gallery hrefs found on the page.
    pub links_found: usize,
    /// Normalization summary, including the unique URLs.
    pub normalized: NormalizeReport,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Scrape summary; `None` when the URLs came from an existing manifest.
    pub scrape: Option<ScrapeOutput>,
    /// URLs handed to the downloader (or that would be, on a dry run).
    pub urls: Vec<String>,
    /// Download counts; `None` on a dry run.
    pub downloads: Option<DownloadStats>,
}

impl RunReport {
    /// Returns true if at least one image failed to download.
    #[must_use]
    pub fn has_download_failures(&self) -> bool {
        self.downloads
            .as_ref()
            .is_some_and(|stats| stats.failed() > 0)
    }
}

fn ensure_output_dir(path: &Path) -> Result<(), ScrapeError> {
    std::fs::create_dir_all(path).map_err(|source| ScrapeError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetches the listing, extracts and normalizes links, and writes the manifest.
#[instrument(skip(client, config), fields(listing_url = %config.listing_url))]
async fn scrape(client: &HttpClient, config: &ScrapeConfig) -> Result<ScrapeOutput, ScrapeError> {
    info!("Fetching listing page");
    let html = client.fetch_text(&config.listing_url).await?;

    let links = extract_gallery_links(&html, &config.selectors)?;
    info!(links = links.len(), "Found gallery links");

    let normalized = normalize_all(&links, &config.base_url);
    if normalized.passed_through > 0 {
        warn!(
            passed_through = normalized.passed_through,
            "Some links did not match the CDN layout and were kept unchanged"
        );
    }
    info!(
        unique = normalized.urls.len(),
        duplicates = normalized.duplicates_removed(),
        "Normalized URLs"
    );

    write_url_manifest(&config.manifest_path, &normalized.urls)?;
    info!(path = %config.manifest_path.display(), "Saved URLs");

    Ok(ScrapeOutput {
        links_found: links.len(),
        normalized,
    })
}

async fn download(
    client: &HttpClient,
    config: &ScrapeConfig,
    urls: &[String],
    progress: Option<ProgressCallback>,
) -> Result<DownloadStats, ScrapeError> {
    let mut engine = DownloadEngine::new(config.concurrency)?;
    if let Some(progress) = progress {
        engine = engine.with_progress(progress);
    }
    info!(dir = %config.output_dir.display(), count = urls.len(), "Downloading images");
    Ok(engine.run(client, urls, &config.output_dir).await?)
}

fn load_manifest_urls(config: &ScrapeConfig) -> Result<Vec<String>, ScrapeError> {
    let urls = read_url_manifest(&config.manifest_path)?;
    info!(path = %config.manifest_path.display(), count = urls.len(), "Loaded URLs from manifest");
    Ok(urls)
}

/// Runs every stage selected by `config.mode` with a client built from
/// `config.http`.
///
/// # Errors
///
/// Returns [`ScrapeError`] for the fatal conditions described on
/// [`run_with_client`].
pub async fn run<F>(config: &ScrapeConfig, make_progress: F) -> Result<RunReport, ScrapeError>
where
    F: FnOnce(usize) -> Option<ProgressCallback>,
{
    let client = HttpClient::with_settings(&config.http)?;
    run_with_client(&client, config, make_progress).await
}

/// Runs every stage selected by `config.mode`.
///
/// `make_progress` is called once with the number of URLs right before the
/// download stage starts; it is not called on a dry run.
///
/// # Errors
///
/// Returns [`ScrapeError::OutputDir`] if the output directory cannot be
/// created, [`ScrapeError::Http`] if the listing fetch fails,
/// [`ScrapeError::Structure`] if the gallery container is missing, and
/// [`ScrapeError::Manifest`] if `urls.json` cannot be written or read.
pub async fn run_with_client<F>(
    client: &HttpClient,
    config: &ScrapeConfig,
    make_progress: F,
) -> Result<RunReport, ScrapeError>
where
    F: FnOnce(usize) -> Option<ProgressCallback>,
{
    ensure_output_dir(&config.output_dir)?;

    let (scrape_output, urls) = match config.mode {
        RunMode::FromManifest => (None, load_manifest_urls(config)?),
        RunMode::Full | RunMode::DryRun => {
            let output = scrape(client, config).await?;
            let urls = output.normalized.urls.clone();
            (Some(output), urls)
        }
    };

    if urls.is_empty() {
        warn!("No image URLs to download");
    }

    let downloads = if config.mode == RunMode::DryRun {
        info!("Dry run: skipping downloads");
        None
    } else {
        let progress = make_progress(urls.len());
        Some(download(client, config, &urls, progress).await?)
    };

    Ok(RunReport {
        scrape: scrape_output,
        urls,
        downloads,
    })
}
