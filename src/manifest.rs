//! `urls.json` persistence for the deduplicated URL collection.
//!
//! The manifest is a pretty-printed JSON array (4-space indentation) that is
//! fully rewritten on every scrape.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default manifest file name, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "urls.json";

/// Errors reading or writing the URL manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Filesystem failure.
    #[error("IO error on manifest {path}: {source}")]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failure.
    #[error("invalid manifest JSON in {path}: {source}")]
    Json {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Writes `urls` to `path` as a 4-space-indented JSON array, replacing any
/// existing file.
///
/// # Errors
///
/// Returns [`ManifestError`] if serialization or the write fails.
#[instrument(skip(urls), fields(path = %path.display(), count = urls.len()))]
pub fn write_url_manifest(path: &Path, urls: &[String]) -> Result<(), ManifestError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    urls.serialize(&mut serializer)
        .map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    buffer.push(b'\n');

    std::fs::write(path, &buffer).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = buffer.len(), "wrote URL manifest");
    Ok(())
}

/// Reads a manifest previously written by [`write_url_manifest`].
///
/// # Errors
///
/// Returns [`ManifestError`] if the file cannot be read or is not a JSON
/// array of strings.
pub fn read_url_manifest(path: &Path) -> Result<Vec<String>, ManifestError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ManifestError::Json {
        path: path.to_path_buf(),
        source,
    })
}
