//! Run orchestration.

use std::{any::Any, collections::BTreeMap, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use log::{debug, error, info};
use scout_fetch::{OpenAiSettings, OpenAiSummarizer, ResourceSource, Summarizer, annotate, search_source};
use scout_keywords::{Corpus, Extraction};
use scout_rank::{Ranker, assemble};
use scout_resource::{RecommendationSet, Resource, ResourceKind};
use scout_text::Language;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::{JoinHandle, JoinSet},
};

use crate::{CompletePayload, Emitter, InputError, ProgressEvent, RunContext, RunError, RunRequest};

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Selected keywords and the candidates they were chosen from.
    pub extraction: Extraction,
    /// Full ranked recommendations.
    pub recommendations: RecommendationSet,
    /// The payload sent on the `complete` event.
    pub payload: CompletePayload,
}

/// Handle to a spawned run.
#[derive(Debug)]
pub struct RunHandle {
    /// The run task.
    task: JoinHandle<Option<RunOutput>>,
}

impl RunHandle {
    /// Aborts the run. Outstanding fetches are dropped and no `complete` is emitted.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns true once the run has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run; `None` if it failed or was cancelled.
    pub async fn wait(self) -> Option<RunOutput> {
        self.task.await.ok().flatten()
    }
}

/// Spawns a run on the current runtime and returns its event stream.
pub fn spawn_run(
    ctx: Arc<RunContext>,
    request: RunRequest,
) -> (RunHandle, UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
        let mut emitter = Emitter::new(tx);
        execute(&ctx, request, &mut emitter).await
    });
    (RunHandle { task }, rx)
}

/// Runs the pipeline and emits exactly one terminal event.
///
/// Returns the output of a successful run. Errors, including panics inside the
/// pipeline, are reported as an `error` event; a run whose consumer went away stops
/// quietly.
pub async fn execute(ctx: &RunContext, request: RunRequest, emitter: &mut Emitter) -> Option<RunOutput> {
    emitter.start(request.documents.len());
    let outcome = AssertUnwindSafe(run_pipeline(ctx, request, emitter))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(RunError::Internal(panic_message(panic.as_ref()))));
    match outcome {
        Ok(output) => {
            emitter.complete(output.payload.clone());
            Some(output)
        }
        Err(RunError::Cancelled) => {
            info!("run cancelled by consumer");
            None
        }
        Err(e) => {
            info!("run failed: {e}");
            emitter.error(e.to_string(), e.kind());
            None
        }
    }
}

/// Describes a caught panic.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    error!("run task panicked: {detail}");
    format!("run task panicked: {detail}")
}

/// Runs every stage after `start`, stopping before the terminal event.
pub async fn run_pipeline(
    ctx: &RunContext,
    request: RunRequest,
    emitter: &mut Emitter,
) -> Result<RunOutput, RunError> {
    let count = request.keyword_count.unwrap_or(ctx.extractor.count);
    if request.documents.is_empty() {
        return Err(InputError::EmptyCorpus.into());
    }
    if count == 0 {
        return Err(InputError::ZeroKeywords.into());
    }
    if request.lambda.is_some_and(|lambda| !(lambda > 0.0 && lambda <= 1.0)) {
        return Err(InputError::InvalidLambda.into());
    }

    proceed(emitter.extract_keywords(), emitter)?;
    let normalizer = ctx.normalizer(request.language.as_deref());
    let corpus = Corpus::new(
        request
            .documents
            .into_iter()
            .map(|doc| normalizer.normalize(doc.id, doc.text))
            .collect(),
    );
    if corpus.non_empty_len() == 0 {
        return Err(InputError::NoContent.into());
    }

    let extractor = ctx.extractor(Some(count), request.lambda);
    let extraction = extractor.extract(&corpus);
    if extraction.is_empty() {
        return Err(InputError::NoKeywords.into());
    }
    info!("keywords: {}", extraction.terms().join(", "));
    proceed(emitter.keywords_extracted(&extraction.keywords), emitter)?;

    let sources = select_sources(ctx, request.platforms.as_deref(), request.language.as_deref());
    proceed(emitter.search_resources(extraction.keywords.len()), emitter)?;
    let fetched = fetch_all(ctx, &sources, &extraction, emitter).await?;

    proceed(emitter.recommend(), emitter)?;
    let ranker = Ranker::new(&corpus, &normalizer, ctx.ranker);
    let mut found: BTreeMap<ResourceKind, usize> = BTreeMap::new();
    let mut records = Vec::new();
    for (keyword, resources) in fetched {
        for resource in resources {
            *found.entry(resource.kind()).or_default() += 1;
            records.extend(ranker.rank(&keyword, resource));
        }
    }
    let mut recommendations = assemble(records, found);
    debug!("assembled {} recommendations", recommendations.len());

    if request.summaries.unwrap_or(ctx.summaries) {
        let summarizer = resolve_summarizer(ctx, request.credential.as_deref());
        let annotated = annotate(&mut recommendations, summarizer.as_deref(), &ctx.annotate).await;
        debug!("annotated {annotated} recommendations");
    }

    let display = request.display.unwrap_or(ctx.display);
    let payload = CompletePayload {
        keywords: extraction.terms(),
        stats: recommendations.stats(),
        recommended_resources: recommendations.views(&display),
    };
    Ok(RunOutput {
        extraction,
        recommendations,
        payload,
    })
}

/// Maps a failed emission to cancellation.
fn proceed(emitted: bool, emitter: &Emitter) -> Result<(), RunError> {
    if !emitted && emitter.is_closed() {
        return Err(RunError::Cancelled);
    }
    Ok(())
}

/// The context's sources, restricted to `platforms` when given.
///
/// A request language switches language-dependent sources to that language, resolved
/// the same way as the normalizer's.
fn select_sources(
    ctx: &RunContext,
    platforms: Option<&[String]>,
    language: Option<&str>,
) -> Vec<Arc<dyn ResourceSource>> {
    let language = language.map(|tag| Language::from_tag_or_default(tag).tag());
    ctx.sources
        .iter()
        .filter(|s| platforms.is_none_or(|names| names.iter().any(|n| n == s.platform())))
        .map(|s| {
            language
                .and_then(|tag| s.for_language(tag))
                .unwrap_or_else(|| Arc::clone(s))
        })
        .collect()
}

/// Searches every source for every keyword, one keyword at a time.
///
/// Results are returned in keyword order, then source order, regardless of completion
/// order, so ties later rank by first-seen keyword.
async fn fetch_all(
    ctx: &RunContext,
    sources: &[Arc<dyn ResourceSource>],
    extraction: &Extraction,
    emitter: &mut Emitter,
) -> Result<Vec<(String, Vec<Resource>)>, RunError> {
    let total = extraction.keywords.len();
    let mut fetched = Vec::with_capacity(total * sources.len());

    for (index, keyword) in extraction.keywords.iter().enumerate() {
        proceed(emitter.keyword_start(&keyword.term, index, total), emitter)?;

        let mut tasks = JoinSet::new();
        for (slot, source) in sources.iter().enumerate() {
            let source = Arc::clone(source);
            let term = keyword.term.clone();
            let limit = ctx.max_per_platform;
            tasks.spawn(async move { (slot, search_source(source.as_ref(), &term, limit).await) });
        }

        let mut slots: Vec<Vec<Resource>> = vec![Vec::new(); sources.len()];
        while let Some(joined) = tasks.join_next().await {
            let (slot, resources) =
                joined.map_err(|e| RunError::Internal(format!("fetch task failed: {e}")))?;
            slots[slot] = resources;
        }
        fetched.extend(slots.into_iter().map(|resources| (keyword.term.clone(), resources)));
    }
    Ok(fetched)
}

/// Picks the summarizer for one run.
///
/// An injected summarizer wins; otherwise a credential enables the chat-completions
/// summarizer. `None` leaves only the fallback summaries.
fn resolve_summarizer(ctx: &RunContext, credential: Option<&str>) -> Option<Arc<dyn Summarizer>> {
    if let Some(summarizer) = &ctx.summarizer {
        return Some(Arc::clone(summarizer));
    }
    let api_key = credential.filter(|k| !k.trim().is_empty())?;
    let settings = OpenAiSettings {
        api_key: api_key.to_string(),
        ..ctx.openai.clone()
    };
    match OpenAiSummarizer::new(Arc::clone(&ctx.client), settings) {
        Ok(summarizer) => Some(Arc::new(summarizer)),
        Err(e) => {
            info!("summaries limited to fallbacks: {e}");
            None
        }
    }
}
