//! Content-similarity scoring of fetched resources.

use std::{fmt, str};

use log::debug;
use scout_keywords::Corpus;
use scout_resource::{Resource, ResourceRecord};
use scout_text::{Normalizer, TermCounts};
use serde::{Deserialize, Serialize};

use crate::SparseVector;

/// Minimum similarity for a resource to be recommended.
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// How a resource vector is compared with the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Cosine against the vector of the concatenated corpus.
    #[default]
    Centroid,
    /// Highest cosine against any single document.
    MaxDocument,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Centroid => "centroid",
            Self::MaxDocument => "max_document",
        })
    }
}

impl str::FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "centroid" => Ok(Self::Centroid),
            "max_document" => Ok(Self::MaxDocument),
            other => Err(format!("unknown similarity policy '{other}'")),
        }
    }
}

/// Ranker settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankerSettings {
    /// Comparison policy.
    pub policy: Policy,
    /// Minimum similarity to keep a resource.
    pub threshold: f64,
}

impl Default for RankerSettings {
    fn default() -> Self {
        Self {
            policy: Policy::Centroid,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Scores resources against one corpus.
///
/// Corpus vectors are computed once at construction; resources are normalized with the
/// same normalizer the corpus was built with.
pub struct Ranker<'a> {
    /// Corpus vocabulary and IDF.
    corpus: &'a Corpus,
    /// Normalizer shared with the corpus.
    normalizer: &'a Normalizer,
    /// Settings.
    settings: RankerSettings,
    /// Comparison targets: the centroid, or one vector per non-empty document.
    targets: Vec<SparseVector>,
}

impl<'a> Ranker<'a> {
    /// Builds the corpus vectors for `settings.policy`.
    pub fn new(corpus: &'a Corpus, normalizer: &'a Normalizer, settings: RankerSettings) -> Self {
        let targets = match settings.policy {
            Policy::Centroid => {
                let mut merged = TermCounts::new();
                let mut total = 0;
                for doc in corpus.documents() {
                    for (term, count) in doc.terms().iter() {
                        for _ in 0..count {
                            merged.add(term);
                        }
                    }
                    total += doc.total_tokens();
                }
                vec![SparseVector::from_counts(corpus, &merged, total)]
            }
            Policy::MaxDocument => corpus
                .documents()
                .iter()
                .map(|doc| SparseVector::from_counts(corpus, doc.terms(), doc.total_tokens()))
                .filter(|v| !v.is_empty())
                .collect(),
        };
        Self {
            corpus,
            normalizer,
            settings,
            targets,
        }
    }

    /// Settings in use.
    pub fn settings(&self) -> &RankerSettings {
        &self.settings
    }

    /// Similarity of arbitrary text to the corpus, in [0, 1].
    ///
    /// Text that normalizes to nothing, or shares no term with the corpus, scores 0.
    pub fn score_text(&self, text: &str) -> f64 {
        let (tokens, counts) = self.normalizer.analyze(text);
        let vector = SparseVector::from_counts(self.corpus, &counts, tokens.len());
        self.targets
            .iter()
            .map(|target| vector.cosine(target))
            .fold(0.0, f64::max)
    }

    /// Scores a resource by its content or description.
    pub fn score(&self, resource: &Resource) -> f64 {
        self.score_text(resource.text())
    }

    /// Scores a resource and keeps it if it reaches the threshold.
    ///
    /// A score of 0 is never kept, whatever the threshold.
    pub fn rank(&self, keyword: &str, resource: Resource) -> Option<ResourceRecord> {
        let score = self.score(&resource);
        if score <= 0.0 || score < self.settings.threshold {
            debug!(
                "discarding '{}' ({}): similarity {score:.3}",
                resource.title(),
                resource.url()
            );
            return None;
        }
        Some(ResourceRecord::new(resource, score, keyword))
    }
}
