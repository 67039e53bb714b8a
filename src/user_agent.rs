//! Shared User-Agent string for listing and image requests.
//!
//! The gallery host rejects obvious bot traffic, so every request presents a
//! desktop browser identity. Configuration may override it.

/// Browser User-Agent sent with the listing fetch and every image download.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Returns the User-Agent to use, falling back to [`BROWSER_USER_AGENT`] when
/// the override is absent or blank.
#[must_use]
pub(crate) fn resolve_user_agent(override_value: Option<&str>) -> String {
    override_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(BROWSER_USER_AGENT)
        .to_string()
}
