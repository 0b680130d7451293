//! The single writer of a run's progress events.

use log::{debug, warn};
use scout_keywords::Keyword;
use tokio::sync::mpsc::UnboundedSender;

use crate::{CompletePayload, ErrorKind, EventDetails, ProgressEvent, Step};

/// Progress of the `start` event.
const START: u8 = 0;
/// Progress when extraction begins.
const EXTRACT: u8 = 10;
/// Progress once keywords are known.
const EXTRACTED: u8 = 25;
/// Progress when searching begins.
const SEARCH: u8 = 30;
/// Upper bound, exclusive, of per-keyword progress.
const SEARCH_END: u8 = 70;
/// Progress when ranking begins.
const RECOMMEND: u8 = 75;
/// Progress of the `complete` event.
const COMPLETE: u8 = 100;

/// Where the run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing emitted yet.
    Idle,
    /// `start` emitted.
    Started,
    /// `extract_keywords` emitted.
    Extracting,
    /// `search_resources` emitted.
    Searching,
    /// `recommend` emitted.
    Recommending,
    /// A terminal event was emitted or the consumer left.
    Done,
}

/// Emits progress events in order over a channel.
///
/// Transitions are checked: an event that does not follow from the current phase is
/// dropped and logged. Progress never decreases and reaches 100 only on `complete`.
/// After a terminal event, or once the receiver is dropped, nothing more is sent.
#[derive(Debug)]
pub struct Emitter {
    /// Event channel.
    tx: UnboundedSender<ProgressEvent>,
    /// Current phase.
    phase: Phase,
    /// Last emitted progress.
    progress: u8,
    /// Set when the receiver is gone.
    closed: bool,
}

impl Emitter {
    /// Creates an emitter writing to `tx`.
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self {
            tx,
            phase: Phase::Idle,
            progress: START,
            closed: false,
        }
    }

    /// Returns true once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.closed || self.tx.is_closed()
    }

    /// Returns true once a terminal event has been emitted.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Last emitted progress.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// The run was accepted.
    pub fn start(&mut self, documents: usize) -> bool {
        self.emit(
            Step::Start,
            START,
            format!("Processing {documents} document(s)"),
            None,
        )
    }

    /// Keyword extraction began.
    pub fn extract_keywords(&mut self) -> bool {
        self.emit(
            Step::ExtractKeywords,
            EXTRACT,
            "Extracting keywords".to_string(),
            None,
        )
    }

    /// Keywords were selected.
    pub fn keywords_extracted(&mut self, keywords: &[Keyword]) -> bool {
        let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
        self.emit(
            Step::ExtractKeywords,
            EXTRACTED,
            format!("Extracted {} keywords: {}", keywords.len(), terms.join(", ")),
            Some(EventDetails::Keywords {
                keywords: keywords.to_vec(),
            }),
        )
    }

    /// Resource search began.
    pub fn search_resources(&mut self, keywords: usize) -> bool {
        self.emit(
            Step::SearchResources,
            SEARCH,
            format!("Searching resources for {keywords} keywords"),
            None,
        )
    }

    /// Searching for keyword `index` of `total` began.
    pub fn keyword_start(&mut self, keyword: &str, index: usize, total: usize) -> bool {
        self.emit(
            Step::KeywordStart,
            keyword_progress(index, total),
            format!("Searching for '{keyword}' ({}/{total})", index + 1),
            Some(EventDetails::KeywordStart {
                keyword: keyword.to_string(),
                index,
                total,
            }),
        )
    }

    /// Ranking and assembly began.
    pub fn recommend(&mut self) -> bool {
        self.emit(
            Step::Recommend,
            RECOMMEND,
            "Ranking resources".to_string(),
            None,
        )
    }

    /// The run finished.
    pub fn complete(&mut self, payload: CompletePayload) -> bool {
        let recommended: usize = payload.stats.values().map(|s| s.recommended).sum();
        self.emit(
            Step::Complete,
            COMPLETE,
            format!("Recommended {recommended} resources"),
            Some(EventDetails::Complete(Box::new(payload))),
        )
    }

    /// The run failed. Repeats the last progress value.
    pub fn error(&mut self, message: impl Into<String>, kind: ErrorKind) -> bool {
        let progress = self.progress;
        self.emit(
            Step::Error,
            progress,
            message.into(),
            Some(EventDetails::Error { kind }),
        )
    }

    /// Phase reached by emitting `step`, or `None` if `step` may not follow now.
    fn next_phase(&self, step: Step) -> Option<Phase> {
        use Phase::*;
        match (self.phase, step) {
            (Done, _) => None,
            (_, Step::Error) => Some(Done),
            (Idle, Step::Start) => Some(Started),
            (Started | Extracting, Step::ExtractKeywords) => Some(Extracting),
            (Extracting, Step::SearchResources) => Some(Searching),
            (Searching, Step::KeywordStart) => Some(Searching),
            (Searching, Step::Recommend) => Some(Recommending),
            (Recommending, Step::Complete) => Some(Done),
            _ => None,
        }
    }

    /// Sends one event if the transition is legal and the receiver is still there.
    fn emit(
        &mut self,
        step: Step,
        progress: u8,
        message: String,
        details: Option<EventDetails>,
    ) -> bool {
        if self.closed {
            return false;
        }
        let Some(next) = self.next_phase(step) else {
            if self.phase != Phase::Done {
                warn!("dropping out-of-order {step:?} event in phase {:?}", self.phase);
            }
            return false;
        };

        let ceiling = if step == Step::Complete {
            COMPLETE
        } else {
            COMPLETE - 1
        };
        let progress = progress.min(ceiling).max(self.progress);
        let event = ProgressEvent {
            step,
            progress: Some(progress),
            message: Some(message),
            details,
        };
        if self.tx.send(event).is_err() {
            debug!("progress receiver dropped");
            self.closed = true;
            self.phase = Phase::Done;
            return false;
        }
        self.phase = next;
        self.progress = progress;
        true
    }
}

/// Progress for keyword `index` of `total`, strictly inside the search band.
fn keyword_progress(index: usize, total: usize) -> u8 {
    let band = usize::from(SEARCH_END - SEARCH);
    let offset = band * (index + 1) / (total + 1);
    let offset = offset.clamp(1, band - 1);
    SEARCH + u8::try_from(offset).unwrap_or(SEARCH_END - SEARCH - 1)
}
