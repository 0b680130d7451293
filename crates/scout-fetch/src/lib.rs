//! Resource fetching and summary annotation.
//!
//! Each platform is a [`ResourceSource`]. Sources share one [`HttpClient`] that sets
//! the user agent, bounds in-flight requests, and retries transient failures.
//! [`search_source`] is the boundary the pipeline calls: it never fails, and it turns
//! raw hits into validated [`Resource`](scout_resource::Resource)s.
//!
//! After ranking, [`annotate`] attaches summaries to the top records of each type.

#![warn(missing_docs)]

mod arxiv;
mod client;
mod error;
mod github;
mod source;
mod summary;
mod wikipedia;
mod youtube;

pub use arxiv::ArxivSource;
pub use client::{ClientSettings, HttpClient};
pub use error::{FetchError, SummarizeError};
pub use github::GithubSource;
pub use source::{ResourceSource, build_sources, search_source};
pub use summary::{
    AnnotateSettings, FallbackSummarizer, OpenAiSettings, OpenAiSummarizer, Summarizer, annotate,
    fallback_summary,
};
pub use wikipedia::WikipediaSource;
pub use youtube::YoutubeSource;
