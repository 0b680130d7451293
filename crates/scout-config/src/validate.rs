//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for values that will be ignored or
//! clamped at run time.

use std::fmt;

use crate::{Config, KNOWN_PLATFORMS};

/// Language tags with a stop-word list.
const KNOWN_LANGUAGES: &[&str] = &["en", "de", "fr", "es", "it", "pt", "nl"];

/// Accepted aggregation policy names.
const KNOWN_AGGREGATIONS: &[&str] = &["weighted_mean", "sum"];

/// Accepted similarity policy names.
const KNOWN_POLICIES: &[&str] = &["centroid", "max_document"];

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// The keyword count is zero, so every run will be rejected.
    ZeroKeywordCount,
    /// Lambda is outside (0, 1].
    LambdaOutOfRange {
        /// Configured value.
        value: f64,
    },
    /// The language has no stop-word list; English is used instead.
    UnknownLanguage {
        /// Configured tag.
        language: String,
    },
    /// The aggregation policy is not recognized; the default is used instead.
    UnknownAggregation {
        /// Configured name.
        value: String,
    },
    /// The similarity policy is not recognized; the default is used instead.
    UnknownPolicy {
        /// Configured name.
        value: String,
    },
    /// The similarity threshold is outside [0, 1].
    ThresholdOutOfRange {
        /// Configured value.
        value: f64,
    },
    /// A platform name is not recognized and will be skipped.
    UnknownPlatform {
        /// Configured name.
        platform: String,
    },
    /// No platforms are configured, so no resources will be found.
    NoPlatforms,
    /// A display count of zero is raised to one.
    ZeroDisplayCount {
        /// Resource type name.
        kind: &'static str,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroKeywordCount => write!(f, "keywords.count is 0; runs will be rejected"),
            Self::LambdaOutOfRange { value } => {
                write!(f, "keywords.lambda {value} is outside (0, 1]")
            }
            Self::UnknownLanguage { language } => {
                write!(f, "unknown language '{language}', falling back to 'en'")
            }
            Self::UnknownAggregation { value } => {
                write!(f, "unknown aggregation '{value}', using 'weighted_mean'")
            }
            Self::UnknownPolicy { value } => {
                write!(f, "unknown rank policy '{value}', using 'centroid'")
            }
            Self::ThresholdOutOfRange { value } => {
                write!(f, "rank.threshold {value} is outside [0, 1]")
            }
            Self::UnknownPlatform { platform } => {
                write!(f, "unknown platform '{platform}' will be skipped")
            }
            Self::NoPlatforms => write!(f, "no search platforms configured"),
            Self::ZeroDisplayCount { kind } => {
                write!(f, "display.{kind} is 0; at least one result is always shown")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let keywords = &config.keywords;
    if keywords.count == 0 {
        warnings.push(ConfigWarning::ZeroKeywordCount);
    }
    if !(keywords.lambda > 0.0 && keywords.lambda <= 1.0) {
        warnings.push(ConfigWarning::LambdaOutOfRange {
            value: keywords.lambda,
        });
    }
    if !KNOWN_LANGUAGES.contains(&keywords.language.as_str()) {
        warnings.push(ConfigWarning::UnknownLanguage {
            language: keywords.language.clone(),
        });
    }
    if !KNOWN_AGGREGATIONS.contains(&keywords.aggregation.as_str()) {
        warnings.push(ConfigWarning::UnknownAggregation {
            value: keywords.aggregation.clone(),
        });
    }

    if !KNOWN_POLICIES.contains(&config.rank.policy.as_str()) {
        warnings.push(ConfigWarning::UnknownPolicy {
            value: config.rank.policy.clone(),
        });
    }
    if !(0.0..=1.0).contains(&config.rank.threshold) {
        warnings.push(ConfigWarning::ThresholdOutOfRange {
            value: config.rank.threshold,
        });
    }

    if config.search.platforms.is_empty() {
        warnings.push(ConfigWarning::NoPlatforms);
    }
    for platform in &config.search.platforms {
        if !KNOWN_PLATFORMS.contains(&platform.as_str()) {
            warnings.push(ConfigWarning::UnknownPlatform {
                platform: platform.clone(),
            });
        }
    }

    let display = &config.display;
    for (kind, count) in [
        ("text", display.text),
        ("video", display.video),
        ("code", display.code),
    ] {
        if count == 0 {
            warnings.push(ConfigWarning::ZeroDisplayCount { kind });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_keyword_warnings() {
        let mut config = Config::default();
        config.keywords.count = 0;
        config.keywords.lambda = 1.5;
        config.keywords.language = "xx".into();
        config.keywords.aggregation = "median".into();

        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![
                ConfigWarning::ZeroKeywordCount,
                ConfigWarning::LambdaOutOfRange { value: 1.5 },
                ConfigWarning::UnknownLanguage {
                    language: "xx".into()
                },
                ConfigWarning::UnknownAggregation {
                    value: "median".into()
                },
            ]
        );
    }

    #[test]
    fn test_zero_lambda_is_out_of_range() {
        let mut config = Config::default();
        config.keywords.lambda = 0.0;
        assert!(
            validate_config(&config)
                .contains(&ConfigWarning::LambdaOutOfRange { value: 0.0 })
        );
    }

    #[test]
    fn test_platform_warnings() {
        let mut config = Config::default();
        config.search.platforms = vec!["github".into(), "myspace".into()];
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::UnknownPlatform {
                platform: "myspace".into()
            }]
        );

        config.search.platforms.clear();
        assert_eq!(validate_config(&config), vec![ConfigWarning::NoPlatforms]);
    }

    #[test]
    fn test_display_and_rank_warnings() {
        let mut config = Config::default();
        config.display.video = 0;
        config.rank.threshold = -0.1;
        config.rank.policy = "nearest".into();

        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::ZeroDisplayCount { kind: "video" }));
        assert!(warnings.contains(&ConfigWarning::ThresholdOutOfRange { value: -0.1 }));
        assert!(warnings.contains(&ConfigWarning::UnknownPolicy {
            value: "nearest".into()
        }));
    }

    #[test]
    fn test_warning_display() {
        let warning = ConfigWarning::UnknownPlatform {
            platform: "myspace".into(),
        };
        assert_eq!(warning.to_string(), "unknown platform 'myspace' will be skipped");
    }
}
