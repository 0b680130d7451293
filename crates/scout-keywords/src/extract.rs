//! Keyword extraction entry point.
//!
//! Combines term scoring, lexicon boosting and MMR selection:
//!
//! 1. Score every vocabulary term by corpus TF-IDF under the configured aggregation
//! 2. Multiply by lexicon boosts and let matched phrases suppress their parts
//! 3. Select up to `count` keywords with MMR

use std::{cmp::Ordering, sync::Arc};

use log::debug;
use scout_text::Lexicon;
use serde::Serialize;

use crate::{CandidateTerm, Corpus, ScorerSettings, SemanticBooster, select, score_terms};

/// Settings for keyword extraction.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// Number of keywords to select.
    pub count: usize,
    /// MMR trade-off in (0, 1].
    pub lambda: f64,
    /// Scoring policy and document-frequency floors.
    pub scorer: ScorerSettings,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            count: 10,
            lambda: 0.7,
            scorer: ScorerSettings::default(),
        }
    }
}

/// A selected keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    /// The keyword text.
    pub term: String,
    /// Corpus TF-IDF score.
    pub tfidf: f64,
    /// Lexicon multiplier.
    pub boost: f64,
    /// `tfidf * boost`.
    pub combined: f64,
    /// Combined score normalized to [0, 1].
    pub relevance: f64,
    /// MMR score when selected.
    pub mmr: f64,
    /// Number of documents containing the keyword.
    pub df: usize,
}

/// Result of keyword extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Keywords in selection order; the first is the most relevant.
    pub keywords: Vec<Keyword>,
    /// Every candidate that competed, sorted by combined score descending.
    pub candidates: Vec<CandidateTerm>,
}

impl Extraction {
    /// Returns true if no keyword was selected.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keyword strings in selection order.
    pub fn terms(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.term.clone()).collect()
    }
}

/// Extracts keywords from a corpus.
pub struct KeywordExtractor {
    /// Extraction settings.
    settings: ExtractorSettings,
    /// Domain lexicon shared with the normalizer.
    lexicon: Arc<Lexicon>,
}

impl KeywordExtractor {
    /// Creates an extractor.
    pub fn new(settings: ExtractorSettings, lexicon: Arc<Lexicon>) -> Self {
        Self { settings, lexicon }
    }

    /// Settings in use.
    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Runs scoring, boosting and selection over `corpus`.
    pub fn extract(&self, corpus: &Corpus) -> Extraction {
        let scores = score_terms(corpus, &self.lexicon, &self.settings.scorer);
        let candidates = SemanticBooster::new(&self.lexicon).boost(scores);
        debug!(
            "scored {} candidates from {} documents ({} vocabulary terms)",
            candidates.len(),
            corpus.len(),
            corpus.vocabulary_len()
        );

        let picks = select(&candidates, self.settings.count, self.settings.lambda);
        let keywords = picks
            .iter()
            .map(|pick| {
                let c = &candidates[pick.index];
                Keyword {
                    term: c.term.clone(),
                    tfidf: c.tfidf,
                    boost: c.boost,
                    combined: c.combined,
                    relevance: pick.relevance,
                    mmr: pick.mmr,
                    df: c.df,
                }
            })
            .collect();

        let mut candidates = candidates;
        candidates.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });

        Extraction {
            keywords,
            candidates,
        }
    }
}

#[cfg(test)]
mod test {
    use scout_text::{Language, Normalizer};

    use super::*;

    fn extract(texts: &[&str], settings: ExtractorSettings) -> Extraction {
        let lexicon = Arc::new(Lexicon::builtin());
        let normalizer = Normalizer::new(Language::En, Arc::clone(&lexicon));
        let corpus = Corpus::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| normalizer.normalize(format!("paper{i}.txt"), *t))
                .collect(),
        );
        KeywordExtractor::new(settings, lexicon).extract(&corpus)
    }

    /// Twelve short abstracts about transformer attention.
    fn transformer_corpus() -> Vec<String> {
        let topics = [
            "encoder", "decoder", "translation", "summarization", "pretraining", "tokenizer",
            "positional encoding", "sparse kernels", "vision patches", "speech frames",
            "protein sequences", "code completion",
        ];
        topics
            .iter()
            .map(|topic| {
                format!(
                    "The attention mechanism lets transformer layers weigh tokens. \
                     We apply the attention mechanism to {topic}. \
                     Multi-head attention mechanism variants improve transformer {topic} quality."
                )
            })
            .collect()
    }

    #[test]
    fn phrase_wins_over_constituents() {
        let corpus = transformer_corpus();
        let texts: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let extraction = extract(
            &texts,
            ExtractorSettings {
                count: 10,
                lambda: 0.7,
                ..ExtractorSettings::default()
            },
        );

        let terms = extraction.terms();
        assert!(terms.len() <= 10);
        assert!(terms.contains(&"attention mechanism".to_string()), "{terms:?}");
        assert!(!terms.contains(&"attention".to_string()), "{terms:?}");
        assert!(!terms.contains(&"mechanism".to_string()), "{terms:?}");
    }

    #[test]
    fn keywords_are_unique_and_bounded() {
        let corpus = transformer_corpus();
        let texts: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let extraction = extract(
            &texts,
            ExtractorSettings {
                count: 5,
                ..ExtractorSettings::default()
            },
        );
        let mut terms = extraction.terms();
        assert_eq!(terms.len(), 5);
        terms.sort();
        terms.dedup();
        assert_eq!(terms.len(), 5);
        assert_eq!(extraction.keywords[0].relevance, 1.0);
    }

    #[test]
    fn extraction_is_deterministic() {
        let corpus = transformer_corpus();
        let texts: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let first = extract(&texts, ExtractorSettings::default());
        let second = extract(&texts, ExtractorSettings::default());
        assert_eq!(first.keywords, second.keywords);
    }

    #[test]
    fn candidates_sorted_by_combined() {
        let extraction = extract(
            &["gradient descent converges slowly", "gradient descent diverges"],
            ExtractorSettings::default(),
        );
        for pair in extraction.candidates.windows(2) {
            assert!(pair[0].combined >= pair[1].combined);
        }
    }

    #[test]
    fn empty_corpus_yields_nothing() {
        let extraction = extract(&["the of and", ""], ExtractorSettings::default());
        assert!(extraction.is_empty());
        assert!(extraction.candidates.is_empty());
    }
}
