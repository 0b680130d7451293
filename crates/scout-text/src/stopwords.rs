//! Stop-word filtering.
//!
//! Wraps the per-language lists from the `stop-words` crate with a few extra terms that
//! show up constantly in academic PDFs but carry no topical meaning.

use std::collections::HashSet;

use crate::Language;

/// Terms dropped regardless of language: publishing and layout residue.
static DOCUMENT_NOISE: &[&str] = &[
    "abstract", "arxiv", "doi", "et", "al", "fig", "figure", "table", "page", "pp", "vol",
    "preprint", "proceedings", "journal", "conference", "ieee", "acm", "isbn", "issn", "http",
    "https", "www", "com", "org", "edu", "pdf", "html",
];

/// A stop-word filter for one language.
///
/// All words are stored in lowercase for case-insensitive matching.
#[derive(Clone)]
pub struct Stopwords {
    /// Lowercased stop-words.
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new(Language::En)
    }
}

impl Stopwords {
    /// Creates a stop-word filter for `language`.
    pub fn new(language: Language) -> Self {
        let mut words: HashSet<String> = HashSet::new();

        let mut add_words = |slice: &[&str]| {
            for word in slice {
                words.insert(word.to_lowercase());
            }
        };

        add_words(language.stop_word_list());
        add_words(DOCUMENT_NOISE);

        Self { words }
    }

    /// Checks if a term is a stop-word.
    pub fn contains(&self, term: &str) -> bool {
        if term.chars().any(char::is_uppercase) {
            return self.words.contains(&term.to_lowercase());
        }
        self.words.contains(term)
    }

    /// Returns the total number of stop-words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stop-words are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
