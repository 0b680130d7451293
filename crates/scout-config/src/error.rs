//! Error types for scout configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A lexicon multiplier is below 1.0.
    #[error("lexicon multiplier for '{term}' must be at least 1.0, got {value} ({path})")]
    InvalidMultiplier {
        /// Config file that defined the multiplier.
        path: PathBuf,
        /// Lexicon term.
        term: String,
        /// Offending value.
        value: f64,
    },
}
