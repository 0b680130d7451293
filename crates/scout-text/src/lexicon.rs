//! Domain lexicon of boosted AI/ML vocabulary.
//!
//! The lexicon maps terms to a multiplier of at least 1.0. Multi-word entries double as
//! phrases the normalizer matches verbatim, so "attention mechanism" becomes one token
//! instead of two competing words.

use std::collections::{HashMap, HashSet};

use crate::normalize::fold_plural;

/// Built-in vocabulary and multipliers.
static BUILTIN: &[(&str, f64)] = &[
    // Core fields
    ("machine learning", 2.0),
    ("deep learning", 2.0),
    ("neural network", 2.0),
    ("artificial intelligence", 2.0),
    ("large language model", 2.0),
    ("ai", 1.75),
    ("ml", 1.5),
    // Models and architectures
    ("deep neural network", 1.75),
    ("convolutional neural network", 1.75),
    ("recurrent neural network", 1.75),
    ("graph neural network", 1.75),
    ("transformer", 1.75),
    ("attention mechanism", 1.75),
    ("self attention", 1.75),
    ("generative model", 1.75),
    ("generative adversarial network", 1.75),
    ("language model", 1.75),
    ("llm", 1.75),
    ("convolutional", 1.5),
    ("rnn", 1.5),
    ("lstm", 1.5),
    ("cnn", 1.5),
    ("bert", 1.5),
    ("gpt", 1.5),
    ("gan", 1.5),
    ("variational autoencoder", 1.5),
    // Recommendation
    ("recommendation system", 1.75),
    ("recommender system", 1.75),
    ("content based filtering", 1.75),
    ("collaborative filtering", 1.75),
    // Language
    ("natural language processing", 1.75),
    ("natural language", 1.75),
    ("nlp", 1.5),
    ("text processing", 1.5),
    ("word embedding", 1.5),
    // Data science
    ("data mining", 1.5),
    ("feature extraction", 1.5),
    ("dimensionality reduction", 1.5),
    ("principal component analysis", 1.5),
    ("supervised learning", 1.5),
    ("unsupervised learning", 1.5),
    ("reinforcement learning", 1.5),
    ("clustering", 1.5),
    ("classification", 1.5),
    ("regression", 1.5),
    // Optimization
    ("gradient descent", 1.5),
    ("stochastic gradient descent", 1.5),
    ("backpropagation", 1.5),
    ("loss function", 1.5),
    ("probability", 1.25),
    ("optimization", 1.25),
    // Vision
    ("computer vision", 1.75),
    ("image processing", 1.5),
    ("object detection", 1.5),
    ("semantic segmentation", 1.5),
    // General
    ("algorithm", 1.25),
    ("framework", 1.25),
    ("architecture", 1.25),
    ("training", 1.25),
    ("evaluation", 1.25),
];

/// Term multipliers plus the phrase index used for greedy matching.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    /// Folded term to multiplier.
    multipliers: HashMap<String, f64>,
    /// Multi-word entries, as folded space-joined strings.
    phrases: HashSet<String>,
    /// Word count of the longest phrase.
    max_phrase_words: usize,
}

impl Lexicon {
    /// Returns an empty lexicon: every term has multiplier 1.0 and there are no phrases.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the built-in AI/ML lexicon.
    pub fn builtin() -> Self {
        let mut lexicon = Self::empty();
        for (term, multiplier) in BUILTIN {
            lexicon.insert(term, *multiplier);
        }
        lexicon
    }

    /// Builds a lexicon from the built-in table (unless `replace_default`) plus `extra`.
    ///
    /// Entries in `extra` override built-in multipliers. Multipliers below 1.0 are raised
    /// to 1.0.
    pub fn with_overrides<'a>(
        extra: impl IntoIterator<Item = (&'a str, f64)>,
        replace_default: bool,
    ) -> Self {
        let mut lexicon = if replace_default {
            Self::empty()
        } else {
            Self::builtin()
        };
        for (term, multiplier) in extra {
            lexicon.insert(term, multiplier);
        }
        lexicon
    }

    /// Adds or replaces one entry.
    pub fn insert(&mut self, term: &str, multiplier: f64) {
        let words: Vec<String> = term
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| fold_plural(&w.to_lowercase()))
            .collect();
        if words.is_empty() {
            return;
        }
        let key = words.join(" ");
        if words.len() > 1 {
            self.max_phrase_words = self.max_phrase_words.max(words.len());
            self.phrases.insert(key.clone());
        }
        self.multipliers.insert(key, multiplier.max(1.0));
    }

    /// Returns the multiplier for a normalized term, 1.0 when unlisted.
    pub fn multiplier(&self, term: &str) -> f64 {
        self.multipliers.get(term).copied().unwrap_or(1.0)
    }

    /// Returns true if `term` is a multi-word lexicon phrase.
    pub fn is_phrase(&self, term: &str) -> bool {
        self.phrases.contains(term)
    }

    /// Iterates over the multi-word phrases.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    /// Finds the longest phrase starting at `words[start]`.
    ///
    /// Returns the phrase and the number of words it spans.
    pub fn longest_match(&self, words: &[&str], start: usize) -> Option<(String, usize)> {
        let available = words.len().saturating_sub(start);
        let longest = self.max_phrase_words.min(available);
        (2..=longest).rev().find_map(|len| {
            let candidate = words[start..start + len].join(" ");
            self.phrases.contains(&candidate).then_some((candidate, len))
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    /// Returns true if the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}
