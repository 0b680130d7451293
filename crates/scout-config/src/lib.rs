//! Configuration system for scout.
//!
//! scout uses TOML configuration files named `.scout.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.scout.toml` files
//! found, then loading `~/.scout.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawDisplaySettings, RawKeywordSettings, RawLexiconSettings, RawRankSettings,
    RawSearchSettings, RawSummarySettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Platform names understood by the fetcher.
pub const KNOWN_PLATFORMS: &[&str] = &["wikipedia", "arxiv", "youtube", "github"];

/// Top-level merged configuration for scout.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Keyword extraction settings.
    pub keywords: KeywordSettings,
    /// Domain lexicon settings.
    pub lexicon: LexiconSettings,
    /// Resource search settings.
    pub search: SearchSettings,
    /// Similarity ranking settings.
    pub rank: RankSettings,
    /// Per-type display counts.
    pub display: DisplaySettings,
    /// Summary annotation settings.
    pub summary: SummarySettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.scout.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same layout as a `.scout.toml` file, with lexicon terms sorted.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            keywords: self.keywords.clone(),
            lexicon: SerializableLexicon::from(&self.lexicon),
            search: self.search.clone(),
            rank: self.rank.clone(),
            display: self.display.clone(),
            summary: self.summary.clone(),
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Keyword extraction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeywordSettings {
    /// Number of keywords to select.
    pub count: usize,
    /// MMR trade-off in (0, 1]; higher favors relevance.
    pub lambda: f64,
    /// Corpus aggregation policy: `weighted_mean` or `sum`.
    pub aggregation: String,
    /// Minimum number of documents a candidate must appear in.
    pub min_docs: usize,
    /// Minimum number of documents a free-form collocation must appear in.
    pub min_phrase_docs: usize,
    /// Longest collocation length counted.
    pub max_ngram: usize,
    /// Shortest token kept by the normalizer.
    pub min_term_length: usize,
    /// Document language tag.
    pub language: String,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            count: 10,
            lambda: 0.7,
            aggregation: String::from("weighted_mean"),
            min_docs: 1,
            min_phrase_docs: 2,
            max_ngram: 3,
            min_term_length: 2,
            language: String::from("en"),
        }
    }
}

/// Domain lexicon settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LexiconSettings {
    /// Discard the built-in lexicon and use only `terms`.
    pub replace_default: bool,
    /// Additional or overriding term multipliers.
    pub terms: HashMap<String, f64>,
}

/// Resource search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Platforms to query, in order.
    pub platforms: Vec<String>,
    /// Maximum hits requested per platform per keyword.
    pub max_per_platform: usize,
    /// Maximum concurrent outbound requests.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry attempts after the first request.
    pub retries: u32,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            platforms: KNOWN_PLATFORMS.iter().map(|p| (*p).to_string()).collect(),
            max_per_platform: 5,
            concurrency: 8,
            timeout_secs: 15,
            retries: 2,
            user_agent: format!("scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Similarity ranking settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RankSettings {
    /// Minimum similarity for a resource to be kept.
    pub threshold: f64,
    /// Similarity policy: `centroid` or `max_document`.
    pub policy: String,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            policy: String::from("centroid"),
        }
    }
}

/// Per-type display counts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Text resources shown.
    pub text: usize,
    /// Video resources shown.
    pub video: usize,
    /// Code resources shown.
    pub code: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            text: 5,
            video: 5,
            code: 5,
        }
    }
}

/// Summary annotation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Whether summaries are attached at all.
    pub enabled: bool,
    /// Chat model name.
    pub model: String,
    /// Chat completions endpoint.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum annotated resources per type.
    pub max_per_type: usize,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: String::from("gpt-3.5-turbo"),
            endpoint: String::from("https://api.openai.com/v1/chat/completions"),
            timeout_secs: 10,
            max_per_type: 20,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Keyword extraction settings.
    keywords: KeywordSettings,
    /// Lexicon settings with sorted terms.
    lexicon: SerializableLexicon,
    /// Resource search settings.
    search: SearchSettings,
    /// Ranking settings.
    rank: RankSettings,
    /// Display counts.
    display: DisplaySettings,
    /// Summary settings.
    summary: SummarySettings,
}

/// Lexicon settings with sorted terms for deterministic TOML output.
#[derive(Serialize)]
struct SerializableLexicon {
    /// Discard the built-in lexicon.
    replace_default: bool,
    /// Term multipliers (sorted).
    terms: BTreeMap<String, f64>,
}

impl From<&LexiconSettings> for SerializableLexicon {
    fn from(lexicon: &LexiconSettings) -> Self {
        Self {
            replace_default: lexicon.replace_default,
            terms: lexicon
                .terms
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }
}
