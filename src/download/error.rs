//! Error types for the download module.
//!
//! A [`DownloadError`] only ever affects the image it was raised for; the
//! engine records it and moves on to the next URL.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::HttpError;

/// Errors that can occur while downloading a single image.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request or response failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// File system error while writing the image.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No usable file name could be derived from the URL.
    #[error("cannot derive a file name from {url}")]
    NoFilename {
        /// The URL that has no final path segment.
        url: String,
    },
}

impl DownloadError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-filename error.
    pub fn no_filename(url: impl Into<String>) -> Self {
        Self::NoFilename { url: url.into() }
    }
}

// No `From<std::io::Error>`: the IO variant needs the path, which the source
// error does not carry.
