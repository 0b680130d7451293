//! Raw hits, validated resources and ranked records.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{HitError, ResourceKind};

/// Type-specific detail of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResourceDetail {
    /// An article or paper.
    Text {
        /// Extracted article text.
        content: String,
    },
    /// A video.
    Video {
        /// Description snippet.
        description: String,
        /// Platform video id.
        #[serde(skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
        /// Thumbnail URL.
        #[serde(skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },
    /// A code repository.
    Code {
        /// Repository description.
        description: String,
        /// Star count.
        #[serde(skip_serializing_if = "Option::is_none")]
        stars: Option<u64>,
        /// Primary language.
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl ResourceDetail {
    /// The resource type this detail belongs to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Text { .. } => ResourceKind::Text,
            Self::Video { .. } => ResourceKind::Video,
            Self::Code { .. } => ResourceKind::Code,
        }
    }

    /// Text used for similarity: content for articles, description otherwise.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { content } => content,
            Self::Video { description, .. } | Self::Code { description, .. } => description,
        }
    }
}

/// An unvalidated search hit as produced by a platform adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    /// Display title.
    pub title: String,
    /// Link to the resource.
    pub url: String,
    /// Human-readable platform name, such as "Wikipedia".
    pub source: String,
    /// Type-specific detail.
    pub detail: ResourceDetail,
}

/// A validated resource: non-empty title and an http(s) URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Display title, trimmed.
    title: String,
    /// Absolute http or https URL.
    url: Url,
    /// Platform name.
    source: String,
    /// Type-specific detail.
    #[serde(flatten)]
    detail: ResourceDetail,
}

impl TryFrom<RawHit> for Resource {
    type Error = HitError;

    fn try_from(hit: RawHit) -> Result<Self, Self::Error> {
        let title = hit.title.trim();
        if title.is_empty() {
            return Err(HitError::EmptyTitle);
        }
        let url = Url::parse(hit.url.trim()).map_err(|e| HitError::InvalidUrl {
            url: hit.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HitError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
                url: hit.url,
            });
        }
        Ok(Self {
            title: title.to_string(),
            url,
            source: hit.source,
            detail: hit.detail,
        })
    }
}

impl Resource {
    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Resource URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Platform name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Type-specific detail.
    pub fn detail(&self) -> &ResourceDetail {
        &self.detail
    }

    /// Resource type.
    pub fn kind(&self) -> ResourceKind {
        self.detail.kind()
    }

    /// Text used for similarity scoring.
    pub fn text(&self) -> &str {
        self.detail.text()
    }
}

/// How a summary was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// Written by a language model.
    AiGenerated,
    /// The resource's own abstract paragraph.
    Abstract,
    /// A fixed one-line description of an encyclopedia article.
    WikiStub,
}

/// A short description attached to a record after ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Summary text.
    #[serde(rename = "summary")]
    pub text: String,
    /// Provenance of the text.
    #[serde(rename = "summary_type")]
    pub kind: SummaryKind,
}

/// A ranked resource.
///
/// The similarity score is fixed at construction. Summaries may be attached later
/// without touching it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRecord {
    /// The validated resource.
    #[serde(flatten)]
    resource: Resource,
    /// Similarity to the corpus in [0, 1].
    similarity_score: f64,
    /// Keywords whose search returned this resource, first-seen first.
    matched_keywords: Vec<String>,
    /// Optional summary.
    #[serde(flatten)]
    summary: Option<Summary>,
}

impl ResourceRecord {
    /// Creates a record. The score is clamped to [0, 1]; NaN becomes 0.
    pub fn new(resource: Resource, similarity: f64, keyword: impl Into<String>) -> Self {
        let similarity_score = if similarity.is_nan() {
            0.0
        } else {
            similarity.clamp(0.0, 1.0)
        };
        Self {
            resource,
            similarity_score,
            matched_keywords: vec![keyword.into()],
            summary: None,
        }
    }

    /// The validated resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Resource type.
    pub fn kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    /// Resource URL.
    pub fn url(&self) -> &Url {
        self.resource.url()
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.resource.title()
    }

    /// Similarity to the corpus.
    pub fn similarity(&self) -> f64 {
        self.similarity_score
    }

    /// Matched keywords, first-seen first.
    pub fn matched_keywords(&self) -> &[String] {
        &self.matched_keywords
    }

    /// Attached summary, if any.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Attaches a summary, replacing any previous one.
    pub fn set_summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
    }

    /// Merges a duplicate of the same resource into this record.
    ///
    /// The higher-scoring copy's resource and score win; on equal scores this record
    /// is kept. Keywords are unioned with this record's keywords first.
    pub fn absorb(&mut self, other: Self) {
        if other.similarity_score > self.similarity_score {
            self.resource = other.resource;
            self.similarity_score = other.similarity_score;
        }
        for keyword in other.matched_keywords {
            if !self.matched_keywords.contains(&keyword) {
                self.matched_keywords.push(keyword);
            }
        }
    }
}
