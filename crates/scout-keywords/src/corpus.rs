//! Corpus vocabulary and inverse document frequency.

use std::collections::HashMap;

use scout_text::Document;

/// Trait for providing IDF values for terms.
///
/// Returns `None` for terms outside the vocabulary, which callers treat as "ignore".
pub trait IdfProvider {
    /// Returns the IDF value for a term.
    fn idf(&self, term: &str) -> Option<f64>;
}

/// Smoothed inverse document frequency.
///
/// `ln((1 + n) / (1 + df)) + 1`. At least 1.0 for every `df <= n` and strictly decreasing
/// in `df`.
pub fn smoothed_idf(n: usize, df: usize) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
}

/// The documents of one upload, their shared vocabulary, and IDF table.
///
/// Vocabulary indices are assigned in first-seen order: document order, then term order
/// within a document. The IDF table is computed once at construction.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Normalized documents in upload order.
    documents: Vec<Document>,
    /// Terms by vocabulary index.
    terms: Vec<String>,
    /// Term to vocabulary index.
    index: HashMap<String, usize>,
    /// Document frequency by vocabulary index.
    df: Vec<usize>,
    /// IDF by vocabulary index.
    idf: Vec<f64>,
}

impl Corpus {
    /// Builds the vocabulary and IDF table for `documents`.
    pub fn new(documents: Vec<Document>) -> Self {
        let mut terms = Vec::new();
        let mut index = HashMap::new();
        let mut df: Vec<usize> = Vec::new();

        for doc in &documents {
            for (term, _) in doc.terms().iter() {
                let id = *index.entry(term.to_string()).or_insert_with(|| {
                    terms.push(term.to_string());
                    df.push(0);
                    terms.len() - 1
                });
                df[id] += 1;
            }
        }

        let n = documents.len();
        let idf = df.iter().map(|&d| smoothed_idf(n, d)).collect();

        Self {
            documents,
            terms,
            index,
            df,
            idf,
        }
    }

    /// Documents in upload order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents, including empty ones.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents with at least one token.
    pub fn non_empty_len(&self) -> usize {
        self.documents.iter().filter(|d| !d.is_empty()).count()
    }

    /// Vocabulary size.
    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary index of `term`.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term at vocabulary index `id`.
    pub fn term(&self, id: usize) -> &str {
        &self.terms[id]
    }

    /// Document frequency of the term at `id`.
    pub fn df_at(&self, id: usize) -> usize {
        self.df[id]
    }

    /// IDF of the term at `id`.
    pub fn idf_at(&self, id: usize) -> f64 {
        self.idf[id]
    }
}

impl IdfProvider for Corpus {
    fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|id| self.idf[id])
    }
}
