//! Fetch and summarization errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from a platform search.
///
/// These never escape [`search_source`](crate::search_source); they are logged and the
/// platform contributes no resources for that keyword.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure after all retries.
    #[error("request to {url} failed: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },

    /// Non-success status after all retries.
    #[error("request to {url} returned {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status.
        status: StatusCode,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Decode {
        /// Requested URL.
        url: String,
        /// What was wrong.
        reason: String,
    },

    /// A request URL could not be built.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
}

/// Errors from a summarizer. Absorbed per record by the annotator.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The summarizer needs a credential and none was configured.
    #[error("no summarization credential configured")]
    MissingCredential,

    /// The summarizer has nothing to say about this record.
    #[error("no summary available for '{0}'")]
    Unavailable(String),

    /// The summarization request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
