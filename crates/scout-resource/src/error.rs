//! Validation errors for fetched hits.

use thiserror::Error;

/// Reasons a raw hit is rejected at the fetch boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HitError {
    /// The hit has no title after trimming.
    #[error("hit has an empty title")]
    EmptyTitle,

    /// The URL does not parse.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The URL is not http or https.
    #[error("unsupported url scheme '{scheme}' in '{url}'")]
    UnsupportedScheme {
        /// The offending URL.
        url: String,
        /// Its scheme.
        scheme: String,
    },
}
