//! Keyword extraction for scout.
//!
//! Scores every term of a [`Corpus`] by TF-IDF, multiplies scores by the domain lexicon,
//! and picks a small, diverse keyword list with Maximum Marginal Relevance.
//!
//! ```text
//! Corpus -> score_terms -> SemanticBooster -> select -> Vec<Keyword>
//! ```

#![warn(missing_docs)]

mod boost;
mod corpus;
mod extract;
mod mmr;
mod score;

pub use boost::{CandidateTerm, SemanticBooster};
pub use corpus::{Corpus, IdfProvider, smoothed_idf};
pub use extract::{Extraction, ExtractorSettings, Keyword, KeywordExtractor};
pub use mmr::{Selection, select, term_similarity};
pub use score::{Aggregation, ScorerSettings, TermScore, score_terms};
