//! Run errors.

use serde::Serialize;
use thiserror::Error;

/// Problems with the request itself, detected before any fetching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No documents were supplied.
    #[error("no documents were uploaded")]
    EmptyCorpus,

    /// Every document normalized to nothing.
    #[error("the uploaded documents contain no usable text")]
    NoContent,

    /// The requested keyword count is zero.
    #[error("keyword count must be at least 1")]
    ZeroKeywords,

    /// The requested diversity weight is outside `(0, 1]`.
    #[error("lambda must be greater than 0 and at most 1")]
    InvalidLambda,

    /// Scoring left no candidate keyword.
    #[error("no keywords could be extracted from the documents")]
    NoKeywords,
}

/// Classification reported on `error` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request was unusable.
    Input,
    /// Something failed inside the run.
    Internal,
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The request was unusable.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A task panicked or a component could not be built.
    #[error("internal error: {0}")]
    Internal(String),

    /// The consumer went away. Never reported as an event.
    #[error("run cancelled")]
    Cancelled,
}

impl RunError {
    /// Kind reported to the consumer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::Input,
            Self::Internal(_) | Self::Cancelled => ErrorKind::Internal,
        }
    }
}
