//! Constants for the fetch module (target page, timeouts).

/// Gallery listing page scraped by default.
pub const DEFAULT_LISTING_URL: &str = "https://gameinformer.com/covers";

/// Origin that relative hrefs resolve against and canonical URLs are built on.
pub const DEFAULT_BASE_URL: &str = "https://gameinformer.com";

/// Default HTTP connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout (30 seconds), applied to the listing fetch
/// and to every image download.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
