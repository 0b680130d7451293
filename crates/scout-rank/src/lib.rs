//! Similarity ranking and recommendation assembly.
//!
//! The [`Ranker`] projects fetched resources into the corpus TF-IDF space and scores
//! them by cosine similarity. [`assemble`] deduplicates the scored records and groups
//! them into a [`RecommendationSet`](scout_resource::RecommendationSet).

#![warn(missing_docs)]

mod assemble;
mod ranker;
mod vector;

pub use assemble::assemble;
pub use ranker::{DEFAULT_THRESHOLD, Policy, Ranker, RankerSettings};
pub use vector::SparseVector;
