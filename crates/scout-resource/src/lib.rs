//! Resource data model for scout.
//!
//! Platform adapters produce [`RawHit`]s. Hits are validated once, at the boundary,
//! into [`Resource`]s; the ranker turns those into [`ResourceRecord`]s carrying a
//! similarity score, and the assembler collects records into a [`RecommendationSet`].

#![warn(missing_docs)]

mod error;
mod kind;
mod record;
mod set;

pub use error::HitError;
pub use kind::ResourceKind;
pub use record::{RawHit, Resource, ResourceDetail, ResourceRecord, Summary, SummaryKind};
pub use set::{DisplayCounts, KindStats, RecommendationSet};
