//! Error types for gallery extraction.

use thiserror::Error;

/// The listing page does not have the structure the extractor relies on.
///
/// Distinct from [`HttpError`](crate::fetch::HttpError): the page was
/// fetched fine, but its markup changed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// No element carries the gallery container class.
    #[error("could not find div with class '{class}' on the listing page")]
    ContainerNotFound {
        /// The container class that was searched for.
        class: String,
    },

    /// A configured class name does not form a valid CSS selector.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The selector text that failed to parse.
        selector: String,
        /// Parser diagnostics.
        reason: String,
    },
}

impl StructureError {
    /// Creates a missing-container error.
    pub fn container_not_found(class: impl Into<String>) -> Self {
        Self::ContainerNotFound {
            class: class.into(),
        }
    }
}
