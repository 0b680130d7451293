//! Shared, read-only state for runs.

use std::{fmt, sync::Arc, time::Duration};

use log::warn;
use scout_config::Config;
use scout_fetch::{
    AnnotateSettings, ClientSettings, HttpClient, OpenAiSettings, ResourceSource, Summarizer,
    build_sources,
};
use scout_keywords::{Aggregation, ExtractorSettings, KeywordExtractor, ScorerSettings};
use scout_rank::{Policy, RankerSettings};
use scout_resource::DisplayCounts;
use scout_text::{Language, Lexicon, Normalizer, NormalizerSettings};

use crate::RunError;

/// Completion length limit for generated summaries.
const SUMMARY_MAX_TOKENS: u32 = 150;

/// Configuration and collaborators shared by every run.
///
/// Runs never mutate the context; each run owns its documents, corpus and emitter.
pub struct RunContext {
    /// Domain lexicon, shared with normalizers.
    pub lexicon: Arc<Lexicon>,
    /// Normalizer tunables; the language may be overridden per request.
    pub normalizer: NormalizerSettings,
    /// Keyword extraction settings.
    pub extractor: ExtractorSettings,
    /// Similarity ranking settings.
    pub ranker: RankerSettings,
    /// Resources requested per platform and keyword.
    pub max_per_platform: usize,
    /// Default records shown per type.
    pub display: DisplayCounts,
    /// Whether summaries are attached by default.
    pub summaries: bool,
    /// Annotation limits.
    pub annotate: AnnotateSettings,
    /// Chat-completions settings without the credential, which comes from the request.
    pub openai: OpenAiSettings,
    /// Shared HTTP client.
    pub client: Arc<HttpClient>,
    /// Platforms to search, in configured order.
    pub sources: Vec<Arc<dyn ResourceSource>>,
    /// Summarizer used instead of the chat-completions one, if set.
    pub summarizer: Option<Arc<dyn Summarizer>>,
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let platforms: Vec<&str> = self.sources.iter().map(|s| s.platform()).collect();
        f.debug_struct("RunContext")
            .field("normalizer", &self.normalizer)
            .field("extractor", &self.extractor)
            .field("ranker", &self.ranker)
            .field("max_per_platform", &self.max_per_platform)
            .field("display", &self.display)
            .field("summaries", &self.summaries)
            .field("annotate", &self.annotate)
            .field("openai", &self.openai)
            .field("sources", &platforms)
            .finish_non_exhaustive()
    }
}

impl RunContext {
    /// Builds a context from merged configuration.
    ///
    /// Unknown policy or language names fall back to their defaults; `Config::validate`
    /// reports them as warnings.
    pub fn from_config(config: &Config) -> Result<Self, RunError> {
        let lexicon = Arc::new(Lexicon::with_overrides(
            config
                .lexicon
                .terms
                .iter()
                .map(|(term, multiplier)| (term.as_str(), *multiplier)),
            config.lexicon.replace_default,
        ));

        let language = Language::from_tag_or_default(&config.keywords.language);
        let normalizer = NormalizerSettings {
            language,
            min_term_length: config.keywords.min_term_length,
            max_ngram: config.keywords.max_ngram,
        };

        let aggregation = config
            .keywords
            .aggregation
            .parse::<Aggregation>()
            .unwrap_or_else(|e| {
                warn!("{e}; using {}", Aggregation::default());
                Aggregation::default()
            });
        let extractor = ExtractorSettings {
            count: config.keywords.count,
            lambda: config.keywords.lambda,
            scorer: ScorerSettings {
                aggregation,
                min_docs: config.keywords.min_docs,
                min_phrase_docs: config.keywords.min_phrase_docs,
            },
        };

        let policy = config.rank.policy.parse::<Policy>().unwrap_or_else(|e| {
            warn!("{e}; using {}", Policy::default());
            Policy::default()
        });
        let ranker = RankerSettings {
            policy,
            threshold: config.rank.threshold,
        };

        let client = HttpClient::new(&ClientSettings {
            user_agent: config.search.user_agent.clone(),
            timeout: Duration::from_secs(config.search.timeout_secs),
            retries: config.search.retries,
            concurrency: config.search.concurrency,
        })
        .map_err(|e| RunError::Internal(e.to_string()))?;
        let client = Arc::new(client);
        let sources = build_sources(&config.search.platforms, &client, language.tag());

        Ok(Self {
            lexicon,
            normalizer,
            extractor,
            ranker,
            max_per_platform: config.search.max_per_platform,
            display: DisplayCounts {
                text: config.display.text,
                video: config.display.video,
                code: config.display.code,
            },
            summaries: config.summary.enabled,
            annotate: AnnotateSettings {
                max_per_type: config.summary.max_per_type,
                ..AnnotateSettings::default()
            },
            openai: OpenAiSettings {
                api_key: String::new(),
                model: config.summary.model.clone(),
                endpoint: config.summary.endpoint.clone(),
                timeout: Duration::from_secs(config.summary.timeout_secs),
                max_tokens: SUMMARY_MAX_TOKENS,
            },
            client,
            sources,
            summarizer: None,
        })
    }

    /// Replaces the platform sources.
    pub fn with_sources(mut self, sources: Vec<Arc<dyn ResourceSource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Uses `summarizer` for every run instead of the chat-completions summarizer.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// A normalizer for `language`, or for the configured language when unset.
    ///
    /// Unknown tags fall back to the default language.
    pub fn normalizer(&self, language: Option<&str>) -> Normalizer {
        let language = language.map_or(self.normalizer.language, Language::from_tag_or_default);
        Normalizer::with_settings(
            &NormalizerSettings {
                language,
                ..self.normalizer.clone()
            },
            Arc::clone(&self.lexicon),
        )
    }

    /// A keyword extractor with per-run overrides applied.
    pub fn extractor(&self, count: Option<usize>, lambda: Option<f64>) -> KeywordExtractor {
        KeywordExtractor::new(
            ExtractorSettings {
                count: count.unwrap_or(self.extractor.count),
                lambda: lambda.unwrap_or(self.extractor.lambda),
                scorer: self.extractor.scorer.clone(),
            },
            Arc::clone(&self.lexicon),
        )
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn builds_from_defaults() {
        let ctx = RunContext::from_config(&Config::default()).unwrap();
        assert_eq!(ctx.extractor.count, 10);
        assert_eq!(ctx.extractor.scorer.aggregation, Aggregation::WeightedMean);
        assert_eq!(ctx.ranker.policy, Policy::Centroid);
        let platforms: Vec<&str> = ctx.sources.iter().map(|s| s.platform()).collect();
        assert_eq!(platforms, vec!["wikipedia", "arxiv", "youtube", "github"]);
        assert!(ctx.openai.api_key.is_empty());
    }

    #[test]
    fn applies_lexicon_and_falls_back_on_unknown_names() {
        let mut config = Config::default();
        config.lexicon.terms = HashMap::from([("message passing".to_string(), 2.0)]);
        config.rank.policy = "nearest".to_string();
        config.keywords.aggregation = "median".to_string();
        config.keywords.language = "xx".to_string();
        config.search.platforms = vec!["github".to_string()];

        let ctx = RunContext::from_config(&config).unwrap();
        assert_eq!(ctx.lexicon.multiplier("message passing"), 2.0);
        assert!(ctx.lexicon.multiplier("transformer") > 1.0);
        assert_eq!(ctx.ranker.policy, Policy::Centroid);
        assert_eq!(ctx.extractor.scorer.aggregation, Aggregation::WeightedMean);
        assert_eq!(ctx.normalizer.language, Language::En);
        assert_eq!(ctx.sources.len(), 1);
    }

    #[test]
    fn per_run_overrides_leave_defaults_alone() {
        let ctx = RunContext::from_config(&Config::default()).unwrap();
        let extractor = ctx.extractor(Some(3), None);
        assert_eq!(extractor.settings().count, 3);
        assert_eq!(extractor.settings().lambda, 0.7);
        assert_eq!(ctx.extractor(None, Some(0.4)).settings().count, 10);

        let (tokens, _) = ctx.normalizer(Some("de")).analyze("der Graph und die Kante");
        assert!(!tokens.contains(&"der".to_string()));
    }
}
