//! HTTP fetching for the gallery listing page and image bytes.
//!
//! # Example
//!
//! ```no_run
//! use covers_core::fetch::{DEFAULT_LISTING_URL, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let html = client.fetch_text(DEFAULT_LISTING_URL).await?;
//! println!("{} bytes of HTML", html.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::{HttpClient, HttpSettings};
pub use constants::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_LISTING_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::HttpError;
