//! CLI support for the `scout` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod documents;
pub mod export;
pub mod output;

pub use context::CommandContext;
