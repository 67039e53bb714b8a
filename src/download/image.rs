//! Single-image download with the skip-if-present rule.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::DownloadError;
use super::filename::filename_for_url;
use crate::fetch::{HttpClient, HttpError};

/// Prefix and suffix of the temporary file an image is streamed into.
const PARTIAL_PREFIX: &str = ".covers-";
const PARTIAL_SUFFIX: &str = ".part";

/// What happened to one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The image was fetched and written.
    Downloaded {
        /// Final file path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// A file with the same name already existed; no request was made.
    Skipped {
        /// Existing file path.
        path: PathBuf,
    },
}

/// Downloads `url` into `output_dir` unless its file already exists.
///
/// The body is streamed into a uniquely named temporary file in
/// `output_dir` and renamed on success, so an interrupted transfer never
/// leaves a file that a later run would skip.
///
/// # Errors
///
/// Returns [`DownloadError`] if no file name can be derived, the request
/// fails, or the file cannot be written. Partial files are removed.
#[instrument(skip(client, output_dir), fields(url = %url))]
pub async fn download_image(
    client: &HttpClient,
    url: &str,
    output_dir: &Path,
) -> Result<DownloadOutcome, DownloadError> {
    let filename = filename_for_url(url).ok_or_else(|| DownloadError::no_filename(url))?;
    let file_path = output_dir.join(&filename);

    let exists = tokio::fs::try_exists(&file_path)
        .await
        .map_err(|e| DownloadError::io(file_path.clone(), e))?;
    if exists {
        info!(filename = %filename, "Skipping (already exists)");
        return Ok(DownloadOutcome::Skipped { path: file_path });
    }

    info!(filename = %filename, "Downloading");
    let response = client.get(url).await?;

    let partial = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(output_dir)
        .map_err(|e| DownloadError::io(output_dir.to_path_buf(), e))?;
    // The temporary path removes its file on drop unless persisted.
    let (file, partial_path) = partial.into_parts();

    let bytes = match stream_to_file(File::from_std(file), response, url, &partial_path).await {
        Ok(bytes) => bytes,
        Err(error) => {
            debug!(path = %partial_path.display(), "discarding partial file after error");
            return Err(error);
        }
    };

    partial_path
        .persist(&file_path)
        .map_err(|e| DownloadError::io(file_path.clone(), e.error))?;

    info!(filename = %filename, bytes, "Downloaded");
    Ok(DownloadOutcome::Downloaded {
        path: file_path,
        bytes,
    })
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| HttpError::from_body(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
