//! Summary annotation of ranked records.
//!
//! A [`Summarizer`] describes one record. The annotator runs it over the top records of
//! each type and falls back to [`fallback_summary`] when there is no summarizer or a
//! call fails. Annotation never changes scores or order.

use std::{
    fmt,
    sync::{Arc, LazyLock},
    time::Duration,
};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use log::debug;
use regex::Regex;
use scout_resource::{RecommendationSet, ResourceKind, ResourceRecord, Summary, SummaryKind};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{FetchError, HttpClient, SummarizeError};

/// Most characters of resource text sent to the model.
const MAX_PROMPT_CHARS: usize = 2000;

/// Most characters kept from an abstract.
const MAX_ABSTRACT_CHARS: usize = 600;

/// An `Abstract:` paragraph.
static ABSTRACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\babstract\s*:\s*(.+?)(?:\n\s*\n|$)").expect("abstract pattern")
});

/// Runs of whitespace.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Produces a summary for one record.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes `record`.
    async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError>;
}

/// Summarizer that only uses the record's own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSummarizer;

#[async_trait]
impl Summarizer for FallbackSummarizer {
    async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError> {
        fallback_summary(record).ok_or_else(|| SummarizeError::Unavailable(record.title().to_string()))
    }
}

/// Summary derived from the record alone.
///
/// An `Abstract:` paragraph in an article becomes an `abstract` summary. Otherwise an
/// encyclopedia article gets a fixed one-line `wiki_stub`. Anything else has none.
pub fn fallback_summary(record: &ResourceRecord) -> Option<Summary> {
    if record.kind() != ResourceKind::Text {
        return None;
    }
    let text = record.resource().text();
    if let Some(paragraph) = ABSTRACT.captures(text).and_then(|c| c.get(1)) {
        let cleaned = collapse(paragraph.as_str());
        if !cleaned.is_empty() {
            return Some(Summary {
                text: truncate_chars(&cleaned, MAX_ABSTRACT_CHARS),
                kind: SummaryKind::Abstract,
            });
        }
    }
    let encyclopedia = record
        .url()
        .host_str()
        .is_some_and(|host| host == "wikipedia.org" || host.ends_with(".wikipedia.org"));
    encyclopedia.then(|| Summary {
        text: format!("Encyclopedia article about {}.", record.title()),
        kind: SummaryKind::WikiStub,
    })
}

/// Collapses whitespace and trims.
fn collapse(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Truncates to at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

/// Settings for the chat-completions summarizer.
#[derive(Clone)]
pub struct OpenAiSettings {
    /// Bearer credential.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Chat completions endpoint.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Completion length limit.
    pub max_tokens: u32,
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    /// Model name.
    model: &'a str,
    /// Conversation.
    messages: Vec<ChatMessage>,
    /// Completion length limit.
    max_tokens: u32,
    /// Sampling temperature.
    temperature: f32,
}

/// One chat message.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    /// `system`, `user` or `assistant`.
    role: String,
    /// Message text.
    content: String,
}

/// Chat completions response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Completions.
    choices: Vec<ChatChoice>,
}

/// One completion.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// The assistant message.
    message: ChatMessage,
}

/// Summarizer backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiSummarizer {
    /// Shared client.
    client: Arc<HttpClient>,
    /// Endpoint, model and credential.
    settings: OpenAiSettings,
    /// Parsed endpoint.
    endpoint: Url,
}

impl OpenAiSummarizer {
    /// Creates a summarizer. Fails without a credential or with a malformed endpoint.
    pub fn new(client: Arc<HttpClient>, settings: OpenAiSettings) -> Result<Self, SummarizeError> {
        if settings.api_key.trim().is_empty() {
            return Err(SummarizeError::MissingCredential);
        }
        let endpoint = Url::parse(&settings.endpoint).map_err(FetchError::from)?;
        Ok(Self {
            client,
            settings,
            endpoint,
        })
    }
}

/// Builds the user prompt for one record.
fn prompt(record: &ResourceRecord) -> String {
    let (what, focus) = match record.kind() {
        ResourceKind::Text => (
            "article",
            "what it covers, what stands out, and what a reader will learn",
        ),
        ResourceKind::Video => ("video", "what the video teaches and who it suits"),
        ResourceKind::Code => (
            "code repository",
            "what the project implements and what it is useful for",
        ),
    };
    let text = truncate_chars(&collapse(record.resource().text()), MAX_PROMPT_CHARS);
    format!(
        "Summarize this {what} from {} in two or three sentences: {focus}. \
         Do not repeat the title.\n\nTitle: {}\n\nText:\n{text}",
        record.resource().source(),
        record.title()
    )
}

/// Strips wrapping quotes and collapses whitespace in a model reply.
fn clean_reply(reply: &str) -> String {
    collapse(reply.trim().trim_matches(|c| c == '"' || c == '\''))
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You write concise, concrete summaries of learning resources."
                        .to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt(record),
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: 0.7,
        };
        let response: ChatResponse = self
            .client
            .post_json(
                self.endpoint.clone(),
                &self.settings.api_key,
                &request,
                self.settings.timeout,
            )
            .await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| clean_reply(&choice.message.content))
            .unwrap_or_default();
        if text.is_empty() {
            return Err(SummarizeError::Unavailable(record.title().to_string()));
        }
        Ok(Summary {
            text,
            kind: SummaryKind::AiGenerated,
        })
    }
}

/// Annotation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateSettings {
    /// Records annotated per type, from the top of each ranked list.
    pub max_per_type: usize,
    /// Summaries requested at once.
    pub concurrency: usize,
}

impl Default for AnnotateSettings {
    fn default() -> Self {
        Self {
            max_per_type: 20,
            concurrency: 4,
        }
    }
}

/// Summarizes one record, falling back to its own text on failure.
///
/// Hands back the record, with its summary attached when one was produced, and its
/// position in the ranked list.
async fn summarize_one(
    summarizer: Option<&dyn Summarizer>,
    index: usize,
    mut record: ResourceRecord,
) -> (usize, ResourceRecord) {
    let mut summary = None;
    if let Some(summarizer) = summarizer {
        match summarizer.summarize(&record).await {
            Ok(s) => summary = Some(s),
            Err(e) => debug!("summary for '{}' failed: {e}", record.title()),
        }
    }
    if let Some(summary) = summary.or_else(|| fallback_summary(&record)) {
        record.set_summary(summary);
    }
    (index, record)
}

/// Attaches summaries to the top `max_per_type` records of each type.
///
/// Returns the number of records that received a summary. Failures are absorbed per
/// record; scores and order are left untouched. Records are summarized as copies and
/// written back once every call of a type has finished.
pub async fn annotate(
    set: &mut RecommendationSet,
    summarizer: Option<&dyn Summarizer>,
    settings: &AnnotateSettings,
) -> usize {
    let mut annotated = 0;
    for kind in ResourceKind::ALL {
        let pending: Vec<(usize, ResourceRecord)> = set
            .records(kind)
            .iter()
            .take(settings.max_per_type)
            .cloned()
            .enumerate()
            .collect();
        let mut done: Vec<(usize, ResourceRecord)> = stream::iter(pending)
            .map(|(index, record)| summarize_one(summarizer, index, record))
            .buffer_unordered(settings.concurrency.max(1))
            .collect()
            .await;
        done.sort_by_key(|(index, _)| *index);

        for (slot, (_, record)) in set.records_mut(kind).zip(done) {
            if record.summary().is_some() {
                annotated += 1;
            }
            *slot = record;
        }
    }
    annotated
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use scout_resource::{RawHit, Resource, ResourceDetail};

    use super::*;
    use crate::ClientSettings;

    fn record(url: &str, detail: ResourceDetail, score: f64) -> ResourceRecord {
        let resource = Resource::try_from(RawHit {
            title: "Graph neural network".to_string(),
            url: url.to_string(),
            source: "test".to_string(),
            detail,
        })
        .unwrap();
        ResourceRecord::new(resource, score, "graph neural network")
    }

    fn text(content: &str) -> ResourceDetail {
        ResourceDetail::Text {
            content: content.to_string(),
        }
    }

    fn video() -> ResourceDetail {
        ResourceDetail::Video {
            description: "lecture".to_string(),
            video_id: None,
            thumbnail: None,
        }
    }

    /// Summarizer that fails for every record.
    struct Failing;

    #[async_trait]
    impl Summarizer for Failing {
        async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError> {
            Err(SummarizeError::Unavailable(record.title().to_string()))
        }
    }

    /// Summarizer that echoes the title.
    struct Echo;

    #[async_trait]
    impl Summarizer for Echo {
        async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError> {
            Ok(Summary {
                text: format!("About {}", record.title()),
                kind: SummaryKind::AiGenerated,
            })
        }
    }

    #[test]
    fn abstract_paragraph_wins() {
        let r = record(
            "https://example.org/paper",
            text("Title page\n\nAbstract: We study   message passing.\nIt works.\n\nIntroduction"),
            0.5,
        );
        let summary = fallback_summary(&r).unwrap();
        assert_eq!(summary.kind, SummaryKind::Abstract);
        assert_eq!(summary.text, "We study message passing. It works.");
    }

    #[test]
    fn encyclopedia_article_gets_stub() {
        let r = record(
            "https://en.wikipedia.org/wiki/Graph_neural_network",
            text("A graph neural network is a network."),
            0.5,
        );
        let summary = fallback_summary(&r).unwrap();
        assert_eq!(summary.kind, SummaryKind::WikiStub);
        assert_eq!(summary.text, "Encyclopedia article about Graph neural network.");
    }

    #[test]
    fn other_resources_get_nothing() {
        assert!(fallback_summary(&record("https://example.org/a", text("plain"), 0.5)).is_none());
        assert!(fallback_summary(&record("https://youtube.com/watch?v=x", video(), 0.5)).is_none());
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "word ".repeat(1000);
        assert!(truncate_chars(&long, 10).chars().count() <= 13);
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn reply_is_cleaned() {
        assert_eq!(clean_reply("  \"A  graph\nlibrary.\" "), "A graph library.");
    }

    #[test]
    fn settings_debug_redacts_key() {
        let settings = OpenAiSettings {
            api_key: "sk-secret".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            timeout: Duration::from_secs(10),
            max_tokens: 150,
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn openai_requires_credential() {
        let client = Arc::new(HttpClient::new(&ClientSettings::default()).unwrap());
        let settings = OpenAiSettings {
            api_key: "  ".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            timeout: Duration::from_secs(10),
            max_tokens: 150,
        };
        assert!(matches!(
            OpenAiSummarizer::new(client, settings),
            Err(SummarizeError::MissingCredential)
        ));
    }

    fn sample_set() -> RecommendationSet {
        RecommendationSet::new(
            vec![
                record("https://en.wikipedia.org/wiki/A", text("article a"), 0.9),
                record("https://en.wikipedia.org/wiki/B", text("article b"), 0.8),
                record("https://en.wikipedia.org/wiki/C", text("article c"), 0.7),
                record("https://youtube.com/watch?v=1", video(), 0.6),
            ],
            BTreeMap::new(),
        )
    }

    #[tokio::test]
    async fn failures_fall_back_without_reordering() {
        let mut set = sample_set();
        let before: Vec<f64> = set
            .records(ResourceKind::Text)
            .iter()
            .map(ResourceRecord::similarity)
            .collect();

        let count = annotate(&mut set, Some(&Failing as &dyn Summarizer), &AnnotateSettings::default()).await;
        assert_eq!(count, 3);

        let text = set.records(ResourceKind::Text);
        let after: Vec<f64> = text.iter().map(ResourceRecord::similarity).collect();
        assert_eq!(before, after);
        assert!(text.iter().all(|r| r.summary().unwrap().kind == SummaryKind::WikiStub));
        assert!(set.records(ResourceKind::Video)[0].summary().is_none());
    }

    #[tokio::test]
    async fn respects_max_per_type() {
        let mut set = sample_set();
        let settings = AnnotateSettings {
            max_per_type: 2,
            concurrency: 2,
        };
        let count = annotate(&mut set, Some(&Echo as &dyn Summarizer), &settings).await;
        assert_eq!(count, 3);

        let text = set.records(ResourceKind::Text);
        assert_eq!(text[0].summary().unwrap().kind, SummaryKind::AiGenerated);
        assert!(text[1].summary().is_some());
        assert!(text[2].summary().is_none());
        assert!(set.records(ResourceKind::Video)[0].summary().is_some());
    }

    #[tokio::test]
    async fn no_summarizer_uses_fallback() {
        let mut set = sample_set();
        let count = annotate(&mut set, None, &AnnotateSettings::default()).await;
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn annotation_runs_inside_spawned_task() {
        let summarizer: Option<Arc<dyn Summarizer>> = Some(Arc::new(Echo));
        let task = tokio::spawn(async move {
            let mut set = sample_set();
            let count = annotate(&mut set, summarizer.as_deref(), &AnnotateSettings::default()).await;
            (count, set)
        });
        let (count, set) = task.await.unwrap();
        assert_eq!(count, 4);
        assert!(
            set.records(ResourceKind::Text)
                .iter()
                .all(|r| r.summary().unwrap().text.starts_with("About "))
        );
        assert_eq!(
            set.records(ResourceKind::Video)[0].summary().unwrap().kind,
            SummaryKind::AiGenerated
        );
    }
}
