//! Image downloads into a flat output directory.
//!
//! # Features
//!
//! - File name taken from the canonical URL's final path segment
//! - Existing files are skipped without a network call
//! - Streaming writes through a temporary file, renamed on success
//! - Per-image failures are isolated from the rest of the batch
//! - Optional bounded concurrency with sequential-equivalent results

mod engine;
mod error;
mod filename;
mod image;

pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, EngineError, FailedDownload,
    MAX_CONCURRENCY, ProgressCallback,
};
pub use error::DownloadError;
pub use filename::filename_for_url;
pub use image::{DownloadOutcome, download_image};

// Note: no module-local Result aliases; use `Result<T, DownloadError>` explicitly.
