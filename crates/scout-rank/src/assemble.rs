//! Deduplication and grouping of ranked records.

use std::collections::{BTreeMap, HashMap};

use scout_resource::{RecommendationSet, ResourceKind, ResourceRecord};

/// Builds a recommendation set from records in fetch order.
///
/// Records with the same type and URL are merged: the highest similarity wins and
/// matched keywords are unioned, first-seen keyword first. A merged record keeps the
/// position of its first occurrence, so equal scores rank in first-seen order.
/// `found` holds the number of valid resources fetched per type.
pub fn assemble(
    records: impl IntoIterator<Item = ResourceRecord>,
    found: BTreeMap<ResourceKind, usize>,
) -> RecommendationSet {
    let mut unique: Vec<ResourceRecord> = Vec::new();
    let mut positions: HashMap<(ResourceKind, String), usize> = HashMap::new();

    for record in records {
        let key = (record.kind(), record.url().as_str().to_string());
        match positions.get(&key) {
            Some(&pos) => unique[pos].absorb(record),
            None => {
                positions.insert(key, unique.len());
                unique.push(record);
            }
        }
    }

    RecommendationSet::new(unique, found)
}

#[cfg(test)]
mod test {
    use scout_resource::{RawHit, Resource, ResourceDetail};

    use super::*;

    fn repo(url: &str, score: f64, keyword: &str) -> ResourceRecord {
        let resource = Resource::try_from(RawHit {
            title: url.rsplit('/').next().unwrap_or(url).to_string(),
            url: url.to_string(),
            source: "GitHub".to_string(),
            detail: ResourceDetail::Code {
                description: "repository".to_string(),
                stars: None,
                language: None,
            },
        })
        .unwrap();
        ResourceRecord::new(resource, score, keyword)
    }

    #[test]
    fn duplicate_url_keeps_highest_score() {
        let set = assemble(
            vec![
                repo("https://github.com/pyg-team/pytorch_geometric", 0.62, "graph neural network"),
                repo("https://github.com/dmlc/dgl", 0.70, "graph neural network"),
                repo("https://github.com/pyg-team/pytorch_geometric", 0.78, "message passing"),
            ],
            BTreeMap::from([(ResourceKind::Code, 3)]),
        );
        let code = set.records(ResourceKind::Code);
        assert_eq!(code.len(), 2);
        assert_eq!(code[0].url().as_str(), "https://github.com/pyg-team/pytorch_geometric");
        assert_eq!(code[0].similarity(), 0.78);
        assert_eq!(
            code[0].matched_keywords(),
            ["graph neural network", "message passing"]
        );
        assert_eq!(code[1].similarity(), 0.70);
        assert_eq!(set.stats()[&ResourceKind::Code].found, 3);
        assert_eq!(set.stats()[&ResourceKind::Code].recommended, 2);
    }

    #[test]
    fn same_url_different_type_is_not_merged() {
        let text = ResourceRecord::new(
            Resource::try_from(RawHit {
                title: "dgl".to_string(),
                url: "https://github.com/dmlc/dgl".to_string(),
                source: "Web".to_string(),
                detail: ResourceDetail::Text {
                    content: "about dgl".to_string(),
                },
            })
            .unwrap(),
            0.4,
            "graph",
        );
        let set = assemble(
            vec![repo("https://github.com/dmlc/dgl", 0.5, "graph"), text],
            BTreeMap::new(),
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let set = assemble(
            vec![
                repo("https://github.com/a/first", 0.5, "alpha"),
                repo("https://github.com/a/second", 0.5, "beta"),
                repo("https://github.com/a/third", 0.9, "beta"),
            ],
            BTreeMap::new(),
        );
        let titles: Vec<&str> = set
            .records(ResourceKind::Code)
            .iter()
            .map(ResourceRecord::title)
            .collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn no_duplicate_urls_within_a_type() {
        let records = (0..20).map(|i| {
            repo(
                &format!("https://github.com/org/repo{}", i % 7),
                0.1 + (i as f64) / 40.0,
                "kw",
            )
        });
        let set = assemble(records, BTreeMap::new());
        let code = set.records(ResourceKind::Code);
        assert_eq!(code.len(), 7);
        let mut urls: Vec<&str> = code.iter().map(|r| r.url().as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), 7);
        for pair in code.windows(2) {
            assert!(pair[0].similarity() >= pair[1].similarity());
        }
    }
}
