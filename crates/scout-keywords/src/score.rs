//! Corpus-level TF-IDF term scoring.
//!
//! Per document, `tf(t, d) = count(t, d) / total_tokens(d)` and
//! `score(t, d) = tf(t, d) * idf(t)`. Per-document scores are folded into one corpus
//! score by an [`Aggregation`] policy.

use std::{fmt, str};

use scout_text::{Lexicon, is_noise_term};
use serde::Serialize;

use crate::Corpus;

/// How per-document scores combine into a corpus score.
///
/// The policy changes ranking order, so it is fixed per deployment through configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum over documents. Long corpora and frequent terms dominate.
    Sum,
    /// Mean over the documents containing the term, scaled by `1 + ln(df)`.
    ///
    /// Rewards cross-document consensus without letting raw volume dominate.
    #[default]
    WeightedMean,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::WeightedMean => write!(f, "weighted_mean"),
        }
    }
}

impl str::FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "weighted_mean" | "weighted-mean" | "mean" => Ok(Self::WeightedMean),
            _ => Err(format!(
                "unknown aggregation '{s}', expected one of: weighted_mean, sum"
            )),
        }
    }
}

/// Filters and policy for term scoring.
#[derive(Debug, Clone)]
pub struct ScorerSettings {
    /// Aggregation policy.
    pub aggregation: Aggregation,
    /// Minimum document frequency for any candidate. Clamped to the corpus size.
    pub min_docs: usize,
    /// Minimum document frequency for collocations that are not lexicon phrases.
    /// Clamped to the corpus size.
    pub min_phrase_docs: usize,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::WeightedMean,
            min_docs: 1,
            min_phrase_docs: 2,
        }
    }
}

/// A term's corpus-level TF-IDF score.
#[derive(Debug, Clone, PartialEq)]
pub struct TermScore {
    /// The normalized term.
    pub term: String,
    /// Aggregated TF-IDF score.
    pub tfidf: f64,
    /// Number of documents containing the term.
    pub df: usize,
    /// Vocabulary index, used as the first-seen tie-breaker.
    pub first_seen: usize,
}

/// Scores every eligible term of the corpus.
///
/// Returns scores in vocabulary (first-seen) order. Terms below the document-frequency
/// floors and terms that look like boilerplate residue are skipped.
pub fn score_terms(corpus: &Corpus, lexicon: &Lexicon, settings: &ScorerSettings) -> Vec<TermScore> {
    let vocab = corpus.vocabulary_len();
    let mut sums = vec![0.0_f64; vocab];

    for doc in corpus.documents() {
        let total = doc.total_tokens();
        if total == 0 {
            continue;
        }
        for (term, count) in doc.terms().iter() {
            if let Some(id) = corpus.index_of(term) {
                let tf = f64::from(count) / total as f64;
                sums[id] += tf * corpus.idf_at(id);
            }
        }
    }

    let n = corpus.len().max(1);
    let min_docs = settings.min_docs.clamp(1, n);
    let min_phrase_docs = settings.min_phrase_docs.clamp(1, n);

    sums.into_iter()
        .enumerate()
        .filter_map(|(id, sum)| {
            let term = corpus.term(id);
            let df = corpus.df_at(id);
            let free_collocation = term.contains(' ') && !lexicon.is_phrase(term);
            if df < min_docs || (free_collocation && df < min_phrase_docs) || is_noise_term(term) {
                return None;
            }
            let tfidf = match settings.aggregation {
                Aggregation::Sum => sum,
                Aggregation::WeightedMean => sum / df as f64 * (1.0 + (df as f64).ln()),
            };
            Some(TermScore {
                term: term.to_string(),
                tfidf,
                df,
                first_seen: id,
            })
        })
        .collect()
}
