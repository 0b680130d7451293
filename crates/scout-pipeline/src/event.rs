//! Progress events.

use std::collections::BTreeMap;

use scout_keywords::Keyword;
use scout_resource::{KindStats, ResourceKind, ResourceRecord};
use serde::Serialize;

use crate::ErrorKind;

/// Step tag of a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// The run was accepted.
    Start,
    /// Keyword extraction began, or finished when the event carries keywords.
    ExtractKeywords,
    /// Resource search began.
    SearchResources,
    /// Searching for one keyword began.
    KeywordStart,
    /// Ranking and assembly began.
    Recommend,
    /// The run finished with recommendations.
    Complete,
    /// The run failed.
    Error,
}

impl Step {
    /// Returns true for `complete` and `error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Wire name of the step.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ExtractKeywords => "extract_keywords",
            Self::SearchResources => "search_resources",
            Self::KeywordStart => "keyword_start",
            Self::Recommend => "recommend",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

/// Final result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletePayload {
    /// Keywords in selection order.
    pub keywords: Vec<String>,
    /// Found and recommended counts per type.
    pub stats: BTreeMap<ResourceKind, KindStats>,
    /// Top records per type under the display counts.
    pub recommended_resources: BTreeMap<ResourceKind, Vec<ResourceRecord>>,
}

/// Structured details attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    /// Selected keywords, on the second `extract_keywords` event.
    Keywords {
        /// Keywords with their scores.
        keywords: Vec<Keyword>,
    },
    /// The keyword being searched.
    KeywordStart {
        /// The keyword.
        keyword: String,
        /// Zero-based position in selection order.
        index: usize,
        /// Number of keywords.
        total: usize,
    },
    /// Final result.
    Complete(Box<CompletePayload>),
    /// Failure classification.
    Error {
        /// Error kind.
        kind: ErrorKind,
    },
}

/// One progress event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Step tag.
    pub step: Step,
    /// Progress in 0..=100, non-decreasing within a run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
}

impl ProgressEvent {
    /// The completion payload, if this is a `complete` event.
    pub fn payload(&self) -> Option<&CompletePayload> {
        match &self.details {
            Some(EventDetails::Complete(payload)) => Some(payload),
            _ => None,
        }
    }

    /// The error kind, if this is an `error` event.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.details {
            Some(EventDetails::Error { kind }) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_step_tag() {
        let event = ProgressEvent {
            step: Step::KeywordStart,
            progress: Some(40),
            message: Some("Searching for 'graph'".to_string()),
            details: Some(EventDetails::KeywordStart {
                keyword: "graph".to_string(),
                index: 1,
                total: 3,
            }),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "step": "keyword_start",
                "progress": 40,
                "message": "Searching for 'graph'",
                "details": {"keyword": "graph", "index": 1, "total": 3}
            })
        );
    }

    #[test]
    fn omits_empty_fields() {
        let event = ProgressEvent {
            step: Step::Error,
            progress: None,
            message: None,
            details: Some(EventDetails::Error {
                kind: ErrorKind::Input,
            }),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"step": "error", "details": {"kind": "input"}})
        );
        assert_eq!(event.error_kind(), Some(ErrorKind::Input));
        assert!(event.payload().is_none());
    }

    #[test]
    fn step_names_match_wire_tags() {
        for step in [Step::Start, Step::ExtractKeywords, Step::KeywordStart, Step::Complete] {
            assert_eq!(serde_json::to_value(step).unwrap(), json!(step.as_str()));
        }
    }
}
