//! End-to-end runs against in-memory sources.

use std::{iter, sync::Arc, time::Duration};

use async_trait::async_trait;
use scout_config::Config;
use scout_fetch::{FetchError, ResourceSource, SummarizeError, Summarizer};
use scout_pipeline::{
    ErrorKind, InputDocument, ProgressEvent, RunContext, RunOutput, RunRequest, Step, spawn_run,
};
use scout_resource::{
    DisplayCounts, RawHit, ResourceDetail, ResourceKind, ResourceRecord, Summary, SummaryKind,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// How a fake source answers.
#[derive(Clone, Copy)]
enum Behavior {
    /// One encyclopedia article per keyword.
    Articles,
    /// The same repository for every keyword.
    SameRepo,
    /// Always fails.
    Fail,
    /// Never answers within a test.
    Hang,
}

/// In-memory platform.
struct Fake {
    /// Platform identifier.
    platform: &'static str,
    /// Resource type.
    kind: ResourceKind,
    /// Answer strategy.
    behavior: Behavior,
}

#[async_trait]
impl ResourceSource for Fake {
    fn platform(&self) -> &'static str {
        self.platform
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn search(&self, keyword: &str, _limit: usize) -> Result<Vec<RawHit>, FetchError> {
        match self.behavior {
            Behavior::Articles => Ok(vec![RawHit {
                title: keyword.to_string(),
                url: format!("https://en.wikipedia.org/wiki/{}", keyword.replace(' ', "_")),
                source: "Wikipedia".to_string(),
                detail: ResourceDetail::Text {
                    content: format!(
                        "{keyword} explained. Graph neural networks use message passing \
                         between node features."
                    ),
                },
            }]),
            Behavior::SameRepo => Ok(vec![RawHit {
                title: "pyg-team/pytorch_geometric".to_string(),
                url: "https://github.com/pyg-team/pytorch_geometric".to_string(),
                source: "GitHub".to_string(),
                detail: ResourceDetail::Code {
                    description: "Graph neural network library with message passing layers \
                                  for node classification"
                        .to_string(),
                    stars: Some(21000),
                    language: Some("Python".to_string()),
                },
            }]),
            Behavior::Fail => Err(FetchError::Decode {
                url: "https://www.youtube.com/results".to_string(),
                reason: "no ytInitialData in results page".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Ok(Vec::new())
            }
        }
    }
}

/// Encyclopedia source that serves one language edition.
struct Edition {
    /// Language tag of the edition.
    language: String,
}

#[async_trait]
impl ResourceSource for Edition {
    fn platform(&self) -> &'static str {
        "wikipedia"
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Text
    }

    fn for_language(&self, language: &str) -> Option<Arc<dyn ResourceSource>> {
        if language == self.language {
            return None;
        }
        Some(Arc::new(Self {
            language: language.to_string(),
        }))
    }

    async fn search(&self, keyword: &str, _limit: usize) -> Result<Vec<RawHit>, FetchError> {
        Ok(vec![RawHit {
            title: keyword.to_string(),
            url: format!(
                "https://{}.wikipedia.org/wiki/{}",
                self.language,
                keyword.replace(' ', "_")
            ),
            source: "Wikipedia".to_string(),
            detail: ResourceDetail::Text {
                content: format!("{keyword}: Graphen und Knoten mit message passing."),
            },
        }])
    }
}

/// Summarizer that labels every record.
struct Labeler;

#[async_trait]
impl Summarizer for Labeler {
    async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError> {
        Ok(Summary {
            text: format!("About {}", record.title()),
            kind: SummaryKind::AiGenerated,
        })
    }
}

/// Summarizer that panics on every record.
struct Faulty;

#[async_trait]
impl Summarizer for Faulty {
    async fn summarize(&self, record: &ResourceRecord) -> Result<Summary, SummarizeError> {
        panic!("summarizer fault on '{}'", record.title());
    }
}

fn source(platform: &'static str, kind: ResourceKind, behavior: Behavior) -> Arc<dyn ResourceSource> {
    Arc::new(Fake {
        platform,
        kind,
        behavior,
    })
}

/// Text and code succeed, video fails.
fn context() -> RunContext {
    RunContext::from_config(&Config::default())
        .unwrap()
        .with_sources(vec![
            source("wikipedia", ResourceKind::Text, Behavior::Articles),
            source("youtube", ResourceKind::Video, Behavior::Fail),
            source("github", ResourceKind::Code, Behavior::SameRepo),
        ])
}

fn documents() -> Vec<InputDocument> {
    vec![
        InputDocument::new(
            "gnn-intro.txt",
            "Graph neural networks learn node representations by message passing. \
             Each layer aggregates neighbour features over the graph structure.",
        ),
        InputDocument::new(
            "mpnn.txt",
            "Message passing neural networks generalize convolution to graphs. \
             Node embeddings support link prediction and node classification.",
        ),
        InputDocument::new(
            "scaling.txt",
            "Graph neural networks scale to large graphs with neighbour sampling. \
             Message passing layers aggregate node features efficiently.",
        ),
    ]
}

async fn collect(mut rx: UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn steps(events: &[ProgressEvent]) -> Vec<Step> {
    events.iter().map(|e| e.step).collect()
}

#[tokio::test]
async fn failed_video_platform_still_completes() {
    let (handle, rx) = spawn_run(Arc::new(context()), RunRequest::new(documents()));
    let events = collect(rx).await;
    let output = handle.wait().await.unwrap();

    let last = events.last().unwrap();
    assert_eq!(last.step, Step::Complete);
    let payload = last.payload().unwrap();

    assert!(payload.recommended_resources[&ResourceKind::Video].is_empty());
    assert_eq!(payload.stats[&ResourceKind::Video].found, 0);
    assert!(!payload.recommended_resources[&ResourceKind::Text].is_empty());
    assert!(!payload.recommended_resources[&ResourceKind::Code].is_empty());
    assert_eq!(payload.keywords, output.extraction.terms());
}

#[tokio::test]
async fn events_are_ordered_and_monotonic() {
    let (_handle, rx) = spawn_run(Arc::new(context()), RunRequest::new(documents()));
    let events = collect(rx).await;
    let keyword_count = events.last().unwrap().payload().unwrap().keywords.len();

    let mut expected = vec![
        Step::Start,
        Step::ExtractKeywords,
        Step::ExtractKeywords,
        Step::SearchResources,
    ];
    expected.extend(iter::repeat_n(Step::KeywordStart, keyword_count));
    expected.extend([Step::Recommend, Step::Complete]);
    assert_eq!(steps(&events), expected);

    let progress: Vec<u8> = events.iter().map(|e| e.progress.unwrap()).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert_eq!(progress.iter().filter(|p| **p == 100).count(), 1);
    assert_eq!(events.iter().filter(|e| e.step.is_terminal()).count(), 1);
}

#[tokio::test]
async fn duplicate_repository_is_merged_across_keywords() {
    let (handle, rx) = spawn_run(Arc::new(context()), RunRequest::new(documents()));
    let events = collect(rx).await;
    let output = handle.wait().await.unwrap();

    let code = output.recommendations.records(ResourceKind::Code);
    assert_eq!(code.len(), 1);
    assert_eq!(code[0].matched_keywords(), output.extraction.terms().as_slice());

    let payload = events.last().unwrap().payload().unwrap();
    assert_eq!(payload.stats[&ResourceKind::Code].recommended, 1);
    assert_eq!(
        payload.stats[&ResourceKind::Code].found,
        output.extraction.keywords.len()
    );
}

#[tokio::test]
async fn fallback_summaries_without_credential() {
    let (handle, rx) = spawn_run(Arc::new(context()), RunRequest::new(documents()));
    collect(rx).await;
    let output = handle.wait().await.unwrap();

    for record in output.recommendations.records(ResourceKind::Text) {
        assert_eq!(record.summary().unwrap().kind, SummaryKind::WikiStub);
    }
    assert!(output.recommendations.records(ResourceKind::Code)[0].summary().is_none());
}

#[tokio::test]
async fn injected_summarizer_and_disabled_summaries() {
    let ctx = Arc::new(context().with_summarizer(Arc::new(Labeler)));
    let (handle, rx) = spawn_run(Arc::clone(&ctx), RunRequest::new(documents()));
    collect(rx).await;
    let output = handle.wait().await.unwrap();
    let code = &output.recommendations.records(ResourceKind::Code)[0];
    assert_eq!(code.summary().unwrap().kind, SummaryKind::AiGenerated);

    let request = RunRequest {
        summaries: Some(false),
        ..RunRequest::new(documents())
    };
    let (handle, rx) = spawn_run(ctx, request);
    collect(rx).await;
    let output = handle.wait().await.unwrap();
    assert!(
        ResourceKind::ALL
            .iter()
            .flat_map(|k| output.recommendations.records(*k))
            .all(|r| r.summary().is_none())
    );
}

#[tokio::test]
async fn request_options_override_context() {
    let request = RunRequest {
        keyword_count: Some(2),
        platforms: Some(vec!["github".to_string()]),
        display: Some(DisplayCounts::uniform(1)),
        ..RunRequest::new(documents())
    };
    let (_handle, rx) = spawn_run(Arc::new(context()), request);
    let events = collect(rx).await;
    let payload = events.last().unwrap().payload().unwrap();

    assert!(payload.keywords.len() <= 2);
    assert_eq!(payload.stats[&ResourceKind::Text].found, 0);
    assert_eq!(payload.recommended_resources[&ResourceKind::Code].len(), 1);
    let starts = events.iter().filter(|e| e.step == Step::KeywordStart).count();
    assert_eq!(starts, payload.keywords.len());
}

#[tokio::test]
async fn request_language_selects_encyclopedia_edition() {
    let ctx = Arc::new(
        RunContext::from_config(&Config::default())
            .unwrap()
            .with_sources(vec![Arc::new(Edition {
                language: "en".to_string(),
            })]),
    );

    let hosts = |output: RunOutput| -> Vec<String> {
        output
            .recommendations
            .records(ResourceKind::Text)
            .iter()
            .map(|r| r.url().host_str().unwrap_or_default().to_string())
            .collect()
    };

    let request = RunRequest {
        language: Some("de".to_string()),
        ..RunRequest::new(documents())
    };
    let (handle, rx) = spawn_run(Arc::clone(&ctx), request);
    collect(rx).await;
    let german = hosts(handle.wait().await.unwrap());
    assert!(!german.is_empty());
    assert!(german.iter().all(|h| h == "de.wikipedia.org"), "{german:?}");

    let (handle, rx) = spawn_run(ctx, RunRequest::new(documents()));
    collect(rx).await;
    let english = hosts(handle.wait().await.unwrap());
    assert!(english.iter().all(|h| h == "en.wikipedia.org"), "{english:?}");
}

#[tokio::test]
async fn empty_upload_is_an_input_error() {
    let (handle, rx) = spawn_run(Arc::new(context()), RunRequest::new(Vec::new()));
    let events = collect(rx).await;
    assert!(handle.wait().await.is_none());

    assert_eq!(steps(&events), vec![Step::Start, Step::Error]);
    let error = &events[1];
    assert_eq!(error.error_kind(), Some(ErrorKind::Input));
    assert_eq!(error.progress, Some(0));
}

#[tokio::test]
async fn zero_keywords_is_an_input_error() {
    let request = RunRequest {
        keyword_count: Some(0),
        ..RunRequest::new(documents())
    };
    let (_handle, rx) = spawn_run(Arc::new(context()), request);
    let events = collect(rx).await;
    assert_eq!(events.last().unwrap().error_kind(), Some(ErrorKind::Input));
}

#[tokio::test]
async fn out_of_range_lambda_is_an_input_error() {
    for lambda in [0.0, -0.5, 1.5, f64::NAN] {
        let request = RunRequest {
            lambda: Some(lambda),
            ..RunRequest::new(documents())
        };
        let (handle, rx) = spawn_run(Arc::new(context()), request);
        let events = collect(rx).await;
        assert!(handle.wait().await.is_none());

        assert_eq!(steps(&events), vec![Step::Start, Step::Error], "lambda {lambda}");
        assert_eq!(events[1].error_kind(), Some(ErrorKind::Input));
    }

    let request = RunRequest {
        lambda: Some(1.0),
        ..RunRequest::new(documents())
    };
    let (_handle, rx) = spawn_run(Arc::new(context()), request);
    let events = collect(rx).await;
    assert_eq!(events.last().unwrap().step, Step::Complete);
}

#[tokio::test]
async fn panic_inside_run_is_reported_as_internal_error() {
    let ctx = Arc::new(context().with_summarizer(Arc::new(Faulty)));
    let (handle, rx) = spawn_run(ctx, RunRequest::new(documents()));
    let events = collect(rx).await;
    assert!(handle.wait().await.is_none());

    let terminal: Vec<&ProgressEvent> = events.iter().filter(|e| e.step.is_terminal()).collect();
    assert_eq!(terminal.len(), 1, "{:?}", steps(&events));
    let error = terminal[0];
    assert_eq!(error.step, Step::Error);
    assert_eq!(error.error_kind(), Some(ErrorKind::Internal));
    assert!(error.message.as_deref().unwrap().contains("panicked"));
    assert_eq!(events.last().unwrap().step, Step::Error);
}

#[tokio::test]
async fn stopword_only_documents_have_no_content() {
    let request = RunRequest::new(vec![
        InputDocument::new("a.txt", "The and of to in it is."),
        InputDocument::new("b.txt", ""),
    ]);
    let (_handle, rx) = spawn_run(Arc::new(context()), request);
    let events = collect(rx).await;

    assert_eq!(
        steps(&events),
        vec![Step::Start, Step::ExtractKeywords, Step::Error]
    );
    let error = events.last().unwrap();
    assert_eq!(error.error_kind(), Some(ErrorKind::Input));
    assert_eq!(error.progress, Some(10));
}

#[tokio::test]
async fn cancel_stops_without_complete() {
    let ctx = RunContext::from_config(&Config::default())
        .unwrap()
        .with_sources(vec![source("github", ResourceKind::Code, Behavior::Hang)]);
    let (handle, mut rx) = spawn_run(Arc::new(ctx), RunRequest::new(documents()));

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let started = event.step == Step::KeywordStart;
        events.push(event);
        if started {
            break;
        }
    }
    handle.cancel();
    events.extend(collect(rx).await);

    assert!(events.iter().all(|e| !e.step.is_terminal()));
    assert!(handle.wait().await.is_none());
}

#[tokio::test]
async fn dropped_receiver_stops_the_run() {
    let (handle, rx) = spawn_run(Arc::new(context()), RunRequest::new(documents()));
    drop(rx);
    assert!(handle.wait().await.is_none());
}
