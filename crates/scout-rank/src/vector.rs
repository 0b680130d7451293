//! Sparse TF-IDF vectors over the corpus vocabulary.

use std::{cmp::Ordering, collections::BTreeMap};

use scout_keywords::Corpus;
use scout_text::TermCounts;

/// A sparse vector keyed by vocabulary index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    /// Non-zero entries sorted by index.
    entries: Vec<(usize, f64)>,
    /// Euclidean norm.
    norm: f64,
}

impl SparseVector {
    /// Projects term counts into the corpus space.
    ///
    /// Each weight is `count / total_tokens * idf`. Terms outside the vocabulary are
    /// ignored; zero tokens yield the empty vector.
    pub fn project<'a>(
        corpus: &Corpus,
        counts: impl IntoIterator<Item = (&'a str, u32)>,
        total_tokens: usize,
    ) -> Self {
        if total_tokens == 0 {
            return Self::default();
        }
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for (term, count) in counts {
            if let Some(id) = corpus.index_of(term) {
                let tf = f64::from(count) / total_tokens as f64;
                *weights.entry(id).or_default() += tf * corpus.idf_at(id);
            }
        }
        Self::from_entries(weights.into_iter().collect())
    }

    /// Projects one document's term counts.
    pub fn from_counts(corpus: &Corpus, counts: &TermCounts, total_tokens: usize) -> Self {
        Self::project(corpus, counts.iter(), total_tokens)
    }

    /// Builds a vector from entries sorted by index, dropping zero weights.
    fn from_entries(entries: Vec<(usize, f64)>) -> Self {
        let entries: Vec<(usize, f64)> = entries.into_iter().filter(|(_, w)| *w != 0.0).collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        Self { entries, norm }
    }

    /// Returns true if the vector has no non-zero entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cosine similarity clamped to [0, 1]; 0 when either vector is empty.
    pub fn cosine(&self, other: &Self) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        let (mut i, mut j, mut dot) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    dot += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        (dot / (self.norm * other.norm)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use scout_text::{Language, Lexicon, Normalizer};

    use super::*;

    fn corpus(texts: &[&str]) -> (Corpus, Normalizer) {
        let normalizer = Normalizer::new(Language::En, Arc::new(Lexicon::builtin()));
        let docs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| normalizer.normalize(i.to_string(), *t))
            .collect();
        (Corpus::new(docs), normalizer)
    }

    #[test]
    fn out_of_vocabulary_terms_are_ignored() {
        let (corpus, normalizer) = corpus(&["gradient descent optimizer"]);
        let (tokens, counts) = normalizer.analyze("banana smoothie recipe");
        let v = SparseVector::from_counts(&corpus, &counts, tokens.len());
        assert!(v.is_empty());
    }

    #[test]
    fn cosine_bounds() {
        let (corpus, normalizer) = corpus(&["gradient descent optimizer", "optimizer momentum"]);
        let doc = &corpus.documents()[0];
        let a = SparseVector::from_counts(&corpus, doc.terms(), doc.total_tokens());
        assert!((a.cosine(&a) - 1.0).abs() < 1e-9);
        assert_eq!(a.cosine(&SparseVector::default()), 0.0);

        let (tokens, counts) = normalizer.analyze("momentum optimizer tuning");
        let b = SparseVector::from_counts(&corpus, &counts, tokens.len());
        let sim = a.cosine(&b);
        assert!(sim > 0.0 && sim < 1.0);
        assert_eq!(sim, b.cosine(&a));
    }
}
