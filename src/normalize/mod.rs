//! URL normalization: canonical rewriting plus order-preserving dedupe.
//!
//! Gallery anchors link to several renditions of the same cover (thumbnail
//! styles, plain uploads, `.webp` variants). Normalization maps them all to
//! the single uncompressed rendition so each cover is downloaded once.
//!
//! # Example
//!
//! ```
//! use covers_core::normalize::normalize_url;
//! use url::Url;
//!
//! let base = Url::parse("https://gameinformer.com").unwrap();
//! assert_eq!(
//!     normalize_url("/sites/default/files/2023/06/cover1.png", &base),
//!     "https://gameinformer.com/sites/default/files/styles/no_compression/public/2023/06/cover1.jpg.webp"
//! );
//! ```

mod canonical;
mod dedupe;

pub use canonical::{
    CANONICAL_EXTENSION, FILES_MARKER, NO_COMPRESSION_PREFIX, Normalized, normalize_url,
    normalize_url_outcome,
};
pub use dedupe::dedupe_preserving_order;

use tracing::{debug, instrument};
use url::Url;

/// Outcome of normalizing a batch of hrefs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Unique URLs in first-seen order.
    pub urls: Vec<String>,
    /// Number of input hrefs (before dedupe).
    pub input_count: usize,
    /// Number of hrefs passed through without rewriting.
    pub passed_through: usize,
}

impl NormalizeReport {
    /// Returns how many inputs collapsed into an earlier URL.
    #[must_use]
    pub fn duplicates_removed(&self) -> usize {
        self.input_count - self.urls.len()
    }
}

/// Normalizes every href then removes duplicates, keeping first occurrences.
#[must_use]
#[instrument(skip(raw_urls, base), fields(count = raw_urls.len()))]
pub fn normalize_all(raw_urls: &[String], base: &Url) -> NormalizeReport {
    let mut passed_through = 0;
    let normalized = raw_urls.iter().map(|raw| {
        let outcome = normalize_url_outcome(raw, base);
        if !outcome.is_canonical() {
            passed_through += 1;
        }
        outcome.into_string()
    });
    let urls = dedupe_preserving_order(normalized);

    debug!(
        unique = urls.len(),
        passed_through, "normalized gallery links"
    );

    NormalizeReport {
        urls,
        input_count: raw_urls.len(),
        passed_through,
    }
}
