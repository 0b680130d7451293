//! Text normalization for scout.
//!
//! Turns raw document bodies into token sequences and term-frequency tables that the keyword
//! scorer and the similarity ranker share. The same [`Normalizer`] is applied to uploaded
//! documents and to fetched resource descriptions so both land in one vocabulary.

#![warn(missing_docs)]

mod boilerplate;
mod document;
mod language;
mod lexicon;
mod normalize;
mod stopwords;

pub use boilerplate::{is_noise_term, strip_boilerplate, strip_markup};
pub use document::{Document, TermCounts};
pub use language::Language;
pub use lexicon::Lexicon;
pub use normalize::{Normalizer, NormalizerSettings, fold_plural};
pub use stopwords::Stopwords;
