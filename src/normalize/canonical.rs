//! Rewriting of gallery hrefs into canonical CDN image URLs.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;

/// Path segment that every image URL on the CDN passes through.
pub const FILES_MARKER: &str = "/sites/default/files/";

/// Image style that serves the uncompressed rendition.
pub const NO_COMPRESSION_PREFIX: &str = "styles/no_compression/public/";

/// Extension every canonical URL ends with.
pub const CANONICAL_EXTENSION: &str = ".jpg.webp";

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static IMAGE_EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)\.(jpg|jpeg|png|webp)$"));

/// Result of normalizing one href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Rewritten into the canonical no-compression form.
    Canonical(String),
    /// Unexpected shape; returned unchanged (absolute when it could be resolved).
    PassThrough(String),
}

impl Normalized {
    /// Consumes the outcome and returns the URL.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Canonical(url) | Self::PassThrough(url) => url,
        }
    }

    /// Returns true if the URL was rewritten into canonical form.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical(_))
    }
}

/// Normalizes `raw` against `base` and returns only the URL.
///
/// See [`normalize_url_outcome`] for the rules. Never fails: URLs of an
/// unexpected shape are logged and passed through.
#[must_use]
pub fn normalize_url(raw: &str, base: &Url) -> String {
    normalize_url_outcome(raw, base).into_string()
}

/// Normalizes `raw` into `<base-origin>/sites/default/files/styles/no_compression/public/<path>.jpg.webp`.
///
/// 1. Relative hrefs are resolved against `base`.
/// 2. The path must contain [`FILES_MARKER`]; otherwise the URL passes through.
/// 3. The text after the marker (up to any repeated marker) is kept, minus query and fragment.
/// 4. A leading [`NO_COMPRESSION_PREFIX`] is dropped so it is not doubled.
/// 5. The extension is forced to [`CANONICAL_EXTENSION`].
/// 6. The URL is rebuilt on the origin of `base`.
#[must_use]
pub fn normalize_url_outcome(raw: &str, base: &Url) -> Normalized {
    let Some((absolute, parsed)) = absolutize(raw, base) else {
        warn!(url = %raw, "Could not resolve URL against base; passing through unchanged");
        return Normalized::PassThrough(raw.to_string());
    };

    let path = parsed.path();
    let Some(marker_index) = path.find(FILES_MARKER) else {
        warn!(url = %absolute, "URL doesn't contain {FILES_MARKER}; passing through unchanged");
        return Normalized::PassThrough(absolute);
    };

    let after_marker = &path[marker_index + FILES_MARKER.len()..];
    let relative = after_marker
        .split(FILES_MARKER)
        .next()
        .unwrap_or_default()
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let relative = relative
        .strip_prefix(NO_COMPRESSION_PREFIX)
        .unwrap_or(relative);

    let relative = with_canonical_extension(relative);
    let origin = base.origin().ascii_serialization();
    Normalized::Canonical(format!(
        "{origin}{FILES_MARKER}{NO_COMPRESSION_PREFIX}{relative}"
    ))
}

/// Returns the absolute form of `raw` (as a string and parsed).
///
/// Absolute input is returned verbatim so pass-through keeps it unchanged.
fn absolutize(raw: &str, base: &Url) -> Option<(String, Url)> {
    match Url::parse(raw) {
        Ok(parsed) => Some((raw.to_string(), parsed)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let joined = base.join(raw).ok()?;
            Some((joined.to_string(), joined))
        }
        Err(_) => None,
    }
}

fn with_canonical_extension(path: &str) -> String {
    if path.ends_with(CANONICAL_EXTENSION) {
        path.to_string()
    } else if let Some(stem) = path.strip_suffix(".webp") {
        format!("{stem}{CANONICAL_EXTENSION}")
    } else {
        let stem = IMAGE_EXTENSION_RE.replace(path, "");
        format!("{stem}{CANONICAL_EXTENSION}")
    }
}
