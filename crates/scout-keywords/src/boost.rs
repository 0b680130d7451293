//! Domain-lexicon boosting and phrase precedence.

use std::collections::HashSet;

use scout_text::Lexicon;
use serde::Serialize;

use crate::TermScore;

/// A scored term competing for keyword selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTerm {
    /// The normalized term.
    pub term: String,
    /// Corpus TF-IDF score.
    pub tfidf: f64,
    /// Lexicon multiplier, at least 1.0.
    pub boost: f64,
    /// `tfidf * boost`.
    pub combined: f64,
    /// Number of documents containing the term.
    pub df: usize,
    /// Vocabulary index, the first-seen tie-breaker.
    pub first_seen: usize,
}

/// Re-weights term scores with the domain lexicon.
pub struct SemanticBooster<'a> {
    /// Lexicon providing multipliers and phrases.
    lexicon: &'a Lexicon,
}

impl<'a> SemanticBooster<'a> {
    /// Creates a booster over `lexicon`.
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Applies multipliers, then removes terms subsumed by a present lexicon phrase.
    pub fn boost(&self, scores: Vec<TermScore>) -> Vec<CandidateTerm> {
        let candidates = scores
            .into_iter()
            .map(|s| {
                let boost = self.lexicon.multiplier(&s.term);
                CandidateTerm {
                    combined: s.tfidf * boost,
                    term: s.term,
                    tfidf: s.tfidf,
                    boost,
                    df: s.df,
                    first_seen: s.first_seen,
                }
            })
            .collect();
        self.suppress_constituents(candidates)
    }

    /// Drops candidates whose words form a contiguous part of a lexicon phrase that is
    /// itself a candidate.
    ///
    /// Shorter lexicon phrases survive even when a longer phrase contains them: the
    /// normalizer only produced them where the longer phrase did not match.
    pub fn suppress_constituents(&self, candidates: Vec<CandidateTerm>) -> Vec<CandidateTerm> {
        let mut consumed: HashSet<String> = HashSet::new();
        for phrase in candidates
            .iter()
            .map(|c| c.term.as_str())
            .filter(|t| self.lexicon.is_phrase(t))
        {
            let words: Vec<&str> = phrase.split(' ').collect();
            for len in 1..words.len() {
                for window in words.windows(len) {
                    consumed.insert(window.join(" "));
                }
            }
        }

        candidates
            .into_iter()
            .filter(|c| !consumed.contains(&c.term) || self.lexicon.is_phrase(&c.term))
            .collect()
    }
}
