//! Order-preserving deduplication of normalized URLs.

use std::collections::HashSet;

/// Removes duplicate URLs, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for url in urls {
        if seen.insert(url.clone()) {
            unique.push(url);
        }
    }

    unique
}
