//! Normalized documents and their term counts.

use std::collections::HashMap;

/// Term counts that remember first-seen order.
///
/// Iteration yields terms in the order they were first counted, which keeps vocabulary
/// assignment and tie-breaking deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCounts {
    /// Terms in first-seen order.
    order: Vec<String>,
    /// Term to occurrence count.
    counts: HashMap<String, u32>,
}

impl TermCounts {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `term`.
    pub fn add(&mut self, term: &str) {
        if let Some(count) = self.counts.get_mut(term) {
            *count += 1;
        } else {
            self.order.push(term.to_string());
            self.counts.insert(term.to_string(), 1);
        }
    }

    /// Returns the count for `term`, zero when absent.
    pub fn get(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Returns true if `term` was counted at least once.
    pub fn contains(&self, term: &str) -> bool {
        self.counts.contains_key(term)
    }

    /// Iterates over `(term, count)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.order
            .iter()
            .map(|term| (term.as_str(), self.counts[term]))
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One normalized document of a corpus.
///
/// Immutable once built; only the normalizer constructs it.
#[derive(Debug, Clone)]
pub struct Document {
    /// Caller-supplied identifier, usually a file name.
    id: String,
    /// Original text.
    raw: String,
    /// Cleaned token sequence: unigrams and matched lexicon phrases, in text order.
    tokens: Vec<String>,
    /// Counts of tokens plus collocations.
    terms: TermCounts,
}

impl Document {
    /// Assembles a document from normalizer output.
    pub(crate) fn new(id: String, raw: String, tokens: Vec<String>, terms: TermCounts) -> Self {
        Self {
            id,
            raw,
            tokens,
            terms,
        }
    }

    /// Document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Original text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Cleaned token sequence.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Term-frequency table, including collocations.
    pub fn terms(&self) -> &TermCounts {
        &self.terms
    }

    /// Number of tokens, the denominator of term frequency.
    pub fn total_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if normalization left no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
