//! scout: learning resource recommendations for a folder of documents.
//!
//! scout reads a set of plain-text or markdown documents, extracts the keywords that best
//! describe them, searches Wikipedia, YouTube and GitHub for each keyword, and ranks what
//! it finds by similarity to the documents. The `run` command streams progress while it
//! works; `keywords` runs only the offline extraction stage.

#![warn(missing_docs)]

pub mod cli;
