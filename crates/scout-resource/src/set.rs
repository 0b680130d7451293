//! Ranked recommendations grouped by resource type.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{ResourceKind, ResourceRecord};

/// Number of records to show per resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCounts {
    /// Articles to show.
    pub text: usize,
    /// Videos to show.
    pub video: usize,
    /// Repositories to show.
    pub code: usize,
}

impl Default for DisplayCounts {
    fn default() -> Self {
        Self::uniform(5)
    }
}

impl DisplayCounts {
    /// The same count for every type.
    pub fn uniform(count: usize) -> Self {
        Self {
            text: count,
            video: count,
            code: count,
        }
    }

    /// Count for one type.
    pub fn get(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Text => self.text,
            ResourceKind::Video => self.video,
            ResourceKind::Code => self.code,
        }
    }
}

/// Fetch and recommendation counts for one resource type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindStats {
    /// Valid resources fetched, before deduplication and thresholding.
    pub found: usize,
    /// Resources kept in the ranked list.
    pub recommended: usize,
}

/// Ranked records per resource type.
///
/// Each list is sorted by descending similarity, stable on insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationSet {
    /// Full ranked list per type.
    ranked: BTreeMap<ResourceKind, Vec<ResourceRecord>>,
    /// Fetched counts per type.
    found: BTreeMap<ResourceKind, usize>,
}

impl RecommendationSet {
    /// Builds a set from per-type records in insertion order.
    ///
    /// Records filed under the wrong type are moved to their own list; each list is
    /// then sorted by descending similarity, stable on insertion order.
    pub fn new(
        records: impl IntoIterator<Item = ResourceRecord>,
        found: BTreeMap<ResourceKind, usize>,
    ) -> Self {
        let mut ranked: BTreeMap<ResourceKind, Vec<ResourceRecord>> = BTreeMap::new();
        for record in records {
            ranked.entry(record.kind()).or_default().push(record);
        }
        for list in ranked.values_mut() {
            list.sort_by(|a, b| {
                b.similarity()
                    .partial_cmp(&a.similarity())
                    .unwrap_or(Ordering::Equal)
            });
        }
        Self { ranked, found }
    }

    /// The full ranked list for one type.
    pub fn records(&self, kind: ResourceKind) -> &[ResourceRecord] {
        self.ranked.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mutable access to the records of one type, for attaching summaries.
    pub fn records_mut(&mut self, kind: ResourceKind) -> impl Iterator<Item = &mut ResourceRecord> {
        self.ranked.get_mut(&kind).into_iter().flatten()
    }

    /// The top `count` records of one type.
    ///
    /// `count` is clamped to `[1, available]`, so an empty list yields an empty view
    /// and a zero count still shows the best record.
    pub fn view(&self, kind: ResourceKind, count: usize) -> &[ResourceRecord] {
        let records = self.records(kind);
        let count = count.max(1).min(records.len());
        &records[..count]
    }

    /// Views for every type under the given display counts.
    pub fn views(&self, counts: &DisplayCounts) -> BTreeMap<ResourceKind, Vec<ResourceRecord>> {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.view(kind, counts.get(kind)).to_vec()))
            .collect()
    }

    /// Fetched and recommended counts for every type.
    pub fn stats(&self) -> BTreeMap<ResourceKind, KindStats> {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| {
                let stats = KindStats {
                    found: self.found.get(&kind).copied().unwrap_or_default(),
                    recommended: self.records(kind).len(),
                };
                (kind, stats)
            })
            .collect()
    }

    /// Total number of ranked records.
    pub fn len(&self) -> usize {
        self.ranked.values().map(Vec::len).sum()
    }

    /// Returns true if no type has any record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
