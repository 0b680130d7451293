//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use std::path::PathBuf;

use crate::{
    Config, DisplaySettings, KeywordSettings, LexiconSettings, RankSettings, SearchSettings,
    SummarySettings,
    parse::{
        RawConfig, RawDisplaySettings, RawKeywordSettings, RawRankSettings, RawSearchSettings,
        RawSummarySettings,
    },
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Lexicon terms: merged by term, first definition for each term wins
/// - `replace_default`: first defined value wins, and it also drops terms from lower
///   precedence files
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Config {
        keywords: merge_section(configs, |c| c.keywords.as_ref(), apply_raw_keywords),
        lexicon: merge_lexicon(configs),
        search: merge_section(configs, |c| c.search.as_ref(), apply_raw_search),
        rank: merge_section(configs, |c| c.rank.as_ref(), apply_raw_rank),
        display: merge_section(configs, |c| c.display.as_ref(), apply_raw_display),
        summary: merge_section(configs, |c| c.summary.as_ref(), apply_raw_summary),
        config_root,
    }
}

/// Merges one section, starting from its defaults.
fn merge_section<T, R>(
    configs: &[ParsedConfig],
    section: impl Fn(&RawConfig) -> Option<&R>,
    apply: impl Fn(&mut T, &R),
) -> T
where
    T: Default,
{
    let mut result = T::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(raw) = section(&parsed.config) {
            apply(&mut result, raw);
        }
    }

    result
}

/// Applies raw keyword settings to result, overwriting any present values.
fn apply_raw_keywords(result: &mut KeywordSettings, raw: &RawKeywordSettings) {
    if let Some(v) = raw.count {
        result.count = v;
    }
    if let Some(v) = raw.lambda {
        result.lambda = v;
    }
    if let Some(ref v) = raw.aggregation {
        result.aggregation = v.clone();
    }
    if let Some(v) = raw.min_docs {
        result.min_docs = v;
    }
    if let Some(v) = raw.min_phrase_docs {
        result.min_phrase_docs = v;
    }
    if let Some(v) = raw.max_ngram {
        result.max_ngram = v;
    }
    if let Some(v) = raw.min_term_length {
        result.min_term_length = v;
    }
    if let Some(ref v) = raw.language {
        result.language = v.clone();
    }
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(ref v) = raw.platforms {
        result.platforms = v.clone();
    }
    if let Some(v) = raw.max_per_platform {
        result.max_per_platform = v;
    }
    if let Some(v) = raw.concurrency {
        result.concurrency = v;
    }
    if let Some(v) = raw.timeout_secs {
        result.timeout_secs = v;
    }
    if let Some(v) = raw.retries {
        result.retries = v;
    }
    if let Some(ref v) = raw.user_agent {
        result.user_agent = v.clone();
    }
}

/// Applies raw rank settings to result.
fn apply_raw_rank(result: &mut RankSettings, raw: &RawRankSettings) {
    if let Some(v) = raw.threshold {
        result.threshold = v;
    }
    if let Some(ref v) = raw.policy {
        result.policy = v.clone();
    }
}

/// Applies raw display counts to result.
fn apply_raw_display(result: &mut DisplaySettings, raw: &RawDisplaySettings) {
    if let Some(v) = raw.text {
        result.text = v;
    }
    if let Some(v) = raw.video {
        result.video = v;
    }
    if let Some(v) = raw.code {
        result.code = v;
    }
}

/// Applies raw summary settings to result.
fn apply_raw_summary(result: &mut SummarySettings, raw: &RawSummarySettings) {
    if let Some(v) = raw.enabled {
        result.enabled = v;
    }
    if let Some(ref v) = raw.model {
        result.model = v.clone();
    }
    if let Some(ref v) = raw.endpoint {
        result.endpoint = v.clone();
    }
    if let Some(v) = raw.timeout_secs {
        result.timeout_secs = v;
    }
    if let Some(v) = raw.max_per_type {
        result.max_per_type = v;
    }
}

/// Merges lexicon settings.
///
/// Walks from highest to lowest precedence. A file that sets `replace_default = true`
/// terminates the walk after its own terms are taken.
fn merge_lexicon(configs: &[ParsedConfig]) -> LexiconSettings {
    let mut result = LexiconSettings::default();
    let mut replace_seen = None;

    for parsed in configs {
        let Some(ref lexicon) = parsed.config.lexicon else {
            continue;
        };
        if let Some(ref terms) = lexicon.terms {
            for (term, multiplier) in terms {
                result
                    .terms
                    .entry(term.to_lowercase())
                    .or_insert(*multiplier);
            }
        }
        if replace_seen.is_none() {
            replace_seen = lexicon.replace_default;
        }
        if lexicon.replace_default == Some(true) {
            break;
        }
    }

    result.replace_default = replace_seen.unwrap_or(false);
    result
}
