//! Covers Core Library
//!
//! Scrapes the Game Informer magazine cover gallery: fetches the listing
//! page, extracts gallery links, rewrites them to full-resolution CDN URLs,
//! records them in a JSON manifest, and downloads each image once.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - HTTP client with browser User-Agent and timeouts
//! - [`extract`] - Gallery link extraction from the listing HTML
//! - [`normalize`] - CDN URL canonicalization and order-preserving dedupe
//! - [`manifest`] - `urls.json` persistence
//! - [`download`] - Skip-if-present image downloads and the download engine
//! - [`pipeline`] - End-to-end run composing the stages above

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod extract;
pub mod fetch;
pub mod manifest;
pub mod normalize;
pub mod pipeline;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadOutcome, DownloadStats,
    EngineError, FailedDownload, MAX_CONCURRENCY, ProgressCallback, download_image,
    filename_for_url,
};
pub use extract::{GallerySelectors, StructureError, extract_gallery_links};
pub use fetch::{HttpClient, HttpError, HttpSettings};
pub use manifest::{ManifestError, read_url_manifest, write_url_manifest};
pub use normalize::{
    NormalizeReport, Normalized, dedupe_preserving_order, normalize_all, normalize_url,
};
pub use pipeline::{
    DEFAULT_OUTPUT_DIR, RunMode, RunReport, ScrapeConfig, ScrapeError, ScrapeOutput, run,
};
pub use user_agent::BROWSER_USER_AGENT;
