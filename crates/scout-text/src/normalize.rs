//! The text normalizer.
//!
//! Pipeline per text: strip markup, drop boilerplate, case-fold, split into sentence
//! segments, split segments into words, fold plurals, match lexicon phrases greedily,
//! drop stop-words and short or numeric words, and count collocations of adjacent
//! surviving words.

use std::sync::Arc;

use crate::{
    Document, Language, Lexicon, Stopwords, TermCounts,
    boilerplate::{strip_boilerplate, strip_markup},
};

/// Sentence delimiters; collocations never span them.
const SEGMENT_BREAKS: &[char] = &['.', '!', '?', ';', ':', '\u{3002}'];

/// Tunables for the normalizer.
#[derive(Debug, Clone)]
pub struct NormalizerSettings {
    /// Stop-word language.
    pub language: Language,
    /// Shortest word kept.
    pub min_term_length: usize,
    /// Longest collocation counted, in words. Values below 2 disable collocations.
    pub max_ngram: usize,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            language: Language::En,
            min_term_length: 2,
            max_ngram: 3,
        }
    }
}

/// Folds a trailing plural `s` so that "networks" and "network" merge.
///
/// Leaves words of three characters or fewer alone, and words ending in `ss`, `us`, `is`
/// or `as` ("loss", "corpus", "analysis", "bias").
pub fn fold_plural(word: &str) -> String {
    let keep = word.chars().count() <= 3
        || !word.ends_with('s')
        || ["ss", "us", "is", "as"].iter().any(|end| word.ends_with(end));
    if keep {
        word.to_string()
    } else {
        word[..word.len() - 1].to_string()
    }
}

/// A word before filtering.
struct Word<'a> {
    /// Lowercased surface form, used for stop-word checks.
    surface: &'a str,
    /// Plural-folded form, used for tokens and phrase matching.
    folded: String,
}

/// Converts raw text into tokens and term counts.
#[derive(Clone)]
pub struct Normalizer {
    /// Stop-words for the configured language.
    stopwords: Stopwords,
    /// Shared domain lexicon.
    lexicon: Arc<Lexicon>,
    /// Shortest word kept.
    min_term_length: usize,
    /// Longest collocation counted.
    max_ngram: usize,
}

impl Normalizer {
    /// Creates a normalizer with default settings for `language`.
    pub fn new(language: Language, lexicon: Arc<Lexicon>) -> Self {
        Self::with_settings(
            &NormalizerSettings {
                language,
                ..NormalizerSettings::default()
            },
            lexicon,
        )
    }

    /// Creates a normalizer with explicit settings.
    pub fn with_settings(settings: &NormalizerSettings, lexicon: Arc<Lexicon>) -> Self {
        Self {
            stopwords: Stopwords::new(settings.language),
            lexicon,
            min_term_length: settings.min_term_length.max(1),
            max_ngram: settings.max_ngram,
        }
    }

    /// The lexicon used for phrase matching.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Normalizes one document.
    ///
    /// A document that yields no tokens is still returned; it simply contributes no terms.
    pub fn normalize(&self, id: impl Into<String>, raw: impl Into<String>) -> Document {
        let raw = raw.into();
        let (tokens, terms) = self.analyze(&raw);
        Document::new(id.into(), raw, tokens, terms)
    }

    /// Normalizes arbitrary text into tokens and term counts.
    pub fn analyze(&self, text: &str) -> (Vec<String>, TermCounts) {
        let cleaned = strip_boilerplate(&strip_markup(text)).to_lowercase();

        let mut tokens = Vec::new();
        let mut terms = TermCounts::new();

        for segment in cleaned.split(SEGMENT_BREAKS) {
            let words: Vec<Word<'_>> = segment
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .map(|surface| Word {
                    surface,
                    folded: fold_plural(surface),
                })
                .collect();
            self.analyze_segment(&words, &mut tokens, &mut terms);
        }

        (tokens, terms)
    }

    /// Emits the tokens of one segment and counts its collocations.
    fn analyze_segment(&self, words: &[Word<'_>], tokens: &mut Vec<String>, terms: &mut TermCounts) {
        let folded: Vec<&str> = words.iter().map(|w| w.folded.as_str()).collect();
        let mut run: Vec<&str> = Vec::new();
        let mut i = 0;

        while i < words.len() {
            if let Some((phrase, len)) = self.lexicon.longest_match(&folded, i) {
                self.count_collocations(&run, terms);
                run.clear();
                terms.add(&phrase);
                tokens.push(phrase);
                i += len;
                continue;
            }

            let word = &words[i];
            i += 1;
            if self.stopwords.contains(word.surface) || !self.keeps(&word.folded) {
                continue;
            }
            terms.add(&word.folded);
            tokens.push(word.folded.clone());
            run.push(&word.folded);
        }

        self.count_collocations(&run, terms);
    }

    /// Returns true if a single word passes the length and numeric filters.
    fn keeps(&self, word: &str) -> bool {
        word.chars().count() >= self.min_term_length && !word.chars().all(|c| c.is_numeric())
    }

    /// Counts n-grams of 2..=max_ngram adjacent words in `run`.
    ///
    /// N-grams with a repeated word are skipped.
    fn count_collocations(&self, run: &[&str], terms: &mut TermCounts) {
        for n in 2..=self.max_ngram {
            for window in run.windows(n) {
                let repeated = window
                    .iter()
                    .enumerate()
                    .any(|(i, w)| window[..i].contains(w));
                if !repeated {
                    terms.add(&window.join(" "));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Language::En, Arc::new(Lexicon::builtin()))
    }

    #[test]
    fn fold_plural_rules() {
        assert_eq!(fold_plural("networks"), "network");
        assert_eq!(fold_plural("transformers"), "transformer");
        assert_eq!(fold_plural("loss"), "loss");
        assert_eq!(fold_plural("corpus"), "corpus");
        assert_eq!(fold_plural("analysis"), "analysis");
        assert_eq!(fold_plural("bias"), "bias");
        assert_eq!(fold_plural("gps"), "gps");
    }

    #[test]
    fn case_folds_and_drops_stopwords() {
        let (tokens, _) = normalizer().analyze("The Encoder and the Decoder");
        assert_eq!(tokens, vec!["encoder", "decoder"]);
    }

    #[test]
    fn drops_short_and_numeric_tokens() {
        let (tokens, _) = normalizer().analyze("encoder x 2048 layers 12");
        assert_eq!(tokens, vec!["encoder", "layer"]);
    }

    #[test]
    fn lexicon_phrase_becomes_one_token() {
        let (tokens, terms) =
            normalizer().analyze("Attention mechanisms dominate. Attention mechanism wins.");
        assert_eq!(tokens, vec!["attention mechanism", "dominate", "attention mechanism", "win"]);
        assert_eq!(terms.get("attention mechanism"), 2);
        assert_eq!(terms.get("attention"), 0);
        assert_eq!(terms.get("mechanism"), 0);
    }

    #[test]
    fn longest_phrase_wins() {
        let (tokens, _) = normalizer().analyze("stochastic gradient descent converges");
        assert_eq!(tokens, vec!["stochastic gradient descent", "converge"]);
    }

    #[test]
    fn hyphens_split_words() {
        let (tokens, _) = normalizer().analyze("self-attention encoder");
        assert_eq!(tokens, vec!["self attention", "encoder"]);
    }

    #[test]
    fn counts_collocations_within_segments() {
        let (tokens, terms) = normalizer().analyze("sparse encoder layers. sparse decoder");
        assert_eq!(tokens.len(), 5);
        assert_eq!(terms.get("sparse encoder"), 1);
        assert_eq!(terms.get("sparse encoder layer"), 1);
        assert_eq!(terms.get("encoder layer"), 1);
        assert_eq!(terms.get("sparse decoder"), 1);
        // Never across the sentence break.
        assert_eq!(terms.get("layer sparse"), 0);
        assert_eq!(terms.get("sparse"), 2);
    }

    #[test]
    fn phrase_tokens_break_collocation_runs() {
        let (_, terms) = normalizer().analyze("sparse transformer encoder");
        // "transformer" is a single-word lexicon entry, so it is a plain word here.
        assert_eq!(terms.get("sparse transformer"), 1);

        let (_, terms) = normalizer().analyze("sparse attention mechanism encoder");
        assert_eq!(terms.get("sparse encoder"), 0);
        assert_eq!(terms.get("attention mechanism"), 1);
    }

    #[test]
    fn max_ngram_limits_collocations() {
        let settings = NormalizerSettings {
            max_ngram: 1,
            ..NormalizerSettings::default()
        };
        let normalizer = Normalizer::with_settings(&settings, Arc::new(Lexicon::empty()));
        let (_, terms) = normalizer.analyze("sparse encoder layers");
        assert_eq!(terms.len(), 3);
    }

    #[test]
    fn empty_document_is_retained() {
        let doc = normalizer().normalize("blank.txt", "the of and 42 <br/>");
        assert_eq!(doc.id(), "blank.txt");
        assert!(doc.is_empty());
        assert!(doc.terms().is_empty());
        assert_eq!(doc.raw(), "the of and 42 <br/>");
    }
}
