//! Pipeline runs for scout.
//!
//! A run takes a [`RunRequest`], extracts keywords from its documents, fetches resources
//! for every keyword, ranks and assembles them, and reports progress as a stream of
//! [`ProgressEvent`]s that ends in exactly one `complete` or `error` event.
//!
//! ```text
//! start -> extract_keywords -> search_resources (keyword_start...) -> recommend -> complete
//!                        \______________ error (from any non-terminal step) _____________/
//! ```

#![warn(missing_docs)]

mod context;
mod emitter;
mod error;
mod event;
mod request;
mod run;

pub use context::RunContext;
pub use emitter::Emitter;
pub use error::{ErrorKind, InputError, RunError};
pub use event::{CompletePayload, EventDetails, ProgressEvent, Step};
pub use request::{InputDocument, RunRequest};
pub use run::{RunHandle, RunOutput, execute, run_pipeline, spawn_run};
