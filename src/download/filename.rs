//! File name derivation for downloaded images.
//!
//! The final path segment of the canonical URL is the on-disk name. Its
//! presence in the output directory is what marks an image as downloaded.

use url::Url;

/// Derives the file name for `url`.
///
/// Uses the last path segment of the parsed URL. When that is empty (a
/// trailing slash) or the URL does not parse, falls back to the last
/// `/`-delimited token of the raw string, query and fragment included.
/// Returns `None` when neither yields a usable name.
#[must_use]
pub fn filename_for_url(url: &str) -> Option<String> {
    let from_path = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(ToString::to_string)
    });

    from_path
        .filter(|name| is_usable_filename(name))
        .or_else(|| fallback_filename(url))
}

fn fallback_filename(url: &str) -> Option<String> {
    let token = url.rsplit('/').next().unwrap_or_default();
    is_usable_filename(token).then(|| token.to_string())
}

fn is_usable_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
