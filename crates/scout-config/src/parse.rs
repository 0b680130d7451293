//! Configuration file parsing.
//!
//! Parses individual `.scout.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Keyword extraction section.
    pub keywords: Option<RawKeywordSettings>,
    /// Domain lexicon section.
    pub lexicon: Option<RawLexiconSettings>,
    /// Resource search section.
    pub search: Option<RawSearchSettings>,
    /// Similarity ranking section.
    pub rank: Option<RawRankSettings>,
    /// Display counts section.
    pub display: Option<RawDisplaySettings>,
    /// Summary annotation section.
    pub summary: Option<RawSummarySettings>,
}

/// Raw keyword extraction settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawKeywordSettings {
    /// Number of keywords to select.
    pub count: Option<usize>,
    /// MMR trade-off between relevance and diversity.
    pub lambda: Option<f64>,
    /// Corpus aggregation policy name.
    pub aggregation: Option<String>,
    /// Minimum number of documents a candidate must appear in.
    pub min_docs: Option<usize>,
    /// Minimum number of documents a free-form collocation must appear in.
    pub min_phrase_docs: Option<usize>,
    /// Longest collocation length counted.
    pub max_ngram: Option<usize>,
    /// Shortest token kept by the normalizer.
    pub min_term_length: Option<usize>,
    /// Document language tag.
    pub language: Option<String>,
}

/// Raw lexicon settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLexiconSettings {
    /// Discard the built-in lexicon and use only `terms`.
    pub replace_default: Option<bool>,
    /// Term to boost multiplier.
    pub terms: Option<HashMap<String, f64>>,
}

/// Raw search settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Platform name(s) to query. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub platforms: Option<Vec<String>>,
    /// Maximum hits requested per platform per keyword.
    pub max_per_platform: Option<usize>,
    /// Maximum concurrent outbound requests.
    pub concurrency: Option<usize>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Retry attempts after the first request.
    pub retries: Option<u32>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

/// Raw ranking settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRankSettings {
    /// Minimum similarity for a resource to be kept.
    pub threshold: Option<f64>,
    /// Similarity policy name.
    pub policy: Option<String>,
}

/// Raw per-type display counts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDisplaySettings {
    /// Text resources shown.
    pub text: Option<usize>,
    /// Video resources shown.
    pub video: Option<usize>,
    /// Code resources shown.
    pub code: Option<usize>,
}

/// Raw summary settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSummarySettings {
    /// Whether summaries are attached at all.
    pub enabled: Option<bool>,
    /// Chat model name.
    pub model: Option<String>,
    /// Chat completions endpoint.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Maximum annotated resources per type.
    pub max_per_type: Option<usize>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    let config: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(terms) = config.lexicon.as_ref().and_then(|l| l.terms.as_ref())
        && let Some((term, value)) = terms.iter().find(|(_, v)| **v < 1.0)
    {
        return Err(ConfigError::InvalidMultiplier {
            path: path.to_path_buf(),
            term: term.clone(),
            value: *value,
        });
    }

    Ok(config)
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.keywords.is_none());
        assert!(config.search.is_none());
        assert!(config.summary.is_none());
    }

    #[test]
    fn test_parse_keyword_settings() {
        let toml = r#"
[keywords]
count = 12
lambda = 0.5
aggregation = "sum"
language = "de"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let keywords = config.keywords.unwrap();
        assert_eq!(keywords.count, Some(12));
        assert_eq!(keywords.lambda, Some(0.5));
        assert_eq!(keywords.aggregation.as_deref(), Some("sum"));
        assert_eq!(keywords.language.as_deref(), Some("de"));
        assert!(keywords.max_ngram.is_none());
    }

    #[test]
    fn test_parse_platforms_single_string() {
        let toml = r#"
[search]
platforms = "github"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.search.unwrap().platforms, Some(vec!["github".into()]));
    }

    #[test]
    fn test_parse_platforms_array() {
        let toml = r#"
[search]
platforms = ["wikipedia", "youtube"]
timeout_secs = 5
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let search = config.search.unwrap();
        assert_eq!(
            search.platforms,
            Some(vec!["wikipedia".to_string(), "youtube".to_string()])
        );
        assert_eq!(search.timeout_secs, Some(5));
    }

    #[test]
    fn test_parse_lexicon_terms() {
        let toml = r#"
[lexicon]
replace_default = true

[lexicon.terms]
"graph neural network" = 2.5
diffusion = 1.5
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let lexicon = config.lexicon.unwrap();
        assert_eq!(lexicon.replace_default, Some(true));
        let terms = lexicon.terms.unwrap();
        assert_eq!(terms.get("graph neural network"), Some(&2.5));
        assert_eq!(terms.get("diffusion"), Some(&1.5));
    }

    #[test]
    fn test_parse_rejects_multiplier_below_one() {
        let toml = r#"
[lexicon.terms]
noise = 0.5
"#;
        let err = parse_config_str(toml, Path::new("test.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMultiplier { ref term, .. } if term == "noise"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config_str("this is not valid toml [[[", Path::new("test.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_wrong_type_error() {
        let toml = r#"
[keywords]
count = "ten"
"#;
        let result = parse_config_str(toml, Path::new("test.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_unknown_fields_ignored() {
        let toml = r#"
[rank]
threshold = 0.1
unknown_field = "ignored"

[unknown_section]
foo = "bar"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.rank.unwrap().threshold, Some(0.1));
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("root.toml");
        fs::write(&path, "root = true\n").unwrap();
        assert!(is_root_config(&path));

        fs::write(&path, "[keywords]\ncount = 3\n").unwrap();
        assert!(!is_root_config(&path));

        assert!(!is_root_config(&dir.path().join("missing.toml")));
    }
}
