//! Run input.

use std::fmt;

use scout_resource::DisplayCounts;

/// One uploaded document, already decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// Caller-chosen identifier, such as a file name.
    pub id: String,
    /// Document text.
    pub text: String,
}

impl InputDocument {
    /// Creates a document.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Everything one run needs from its caller.
///
/// Unset options fall back to the run context's configured values.
#[derive(Clone, Default)]
pub struct RunRequest {
    /// Documents in upload order.
    pub documents: Vec<InputDocument>,
    /// Language tag for stop-words.
    pub language: Option<String>,
    /// Number of keywords to select.
    pub keyword_count: Option<usize>,
    /// MMR trade-off.
    pub lambda: Option<f64>,
    /// Records to show per type.
    pub display: Option<DisplayCounts>,
    /// Platforms to search, by identifier.
    pub platforms: Option<Vec<String>>,
    /// Whether to attach summaries.
    pub summaries: Option<bool>,
    /// Credential for the summarization service.
    pub credential: Option<String>,
}

impl RunRequest {
    /// Creates a request for `documents` with every option unset.
    pub fn new(documents: Vec<InputDocument>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }
}

impl fmt::Debug for RunRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunRequest")
            .field("documents", &self.documents.len())
            .field("language", &self.language)
            .field("keyword_count", &self.keyword_count)
            .field("lambda", &self.lambda)
            .field("display", &self.display)
            .field("platforms", &self.platforms)
            .field("summaries", &self.summaries)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
