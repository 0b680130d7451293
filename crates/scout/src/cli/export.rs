//! Writing recommendations to disk.
//!
//! Each resource type gets a subfolder named after it (`text/`, `video/`, `code/`) and
//! each record one numbered `.txt` file: a header with the title, link, source,
//! similarity score, matched keywords and summary, then the resource's own text.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use scout_pipeline::CompletePayload;
use scout_resource::{ResourceDetail, ResourceKind, ResourceRecord};
use thiserror::Error;

/// Longest title kept in a file name.
const MAX_FILE_STEM_CHARS: usize = 100;

/// Line between a record's header and its text.
const RULE: &str = "==================================================";

/// Errors raised while exporting.
#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct ExportError {
    /// The file or folder being written.
    path: PathBuf,
    /// The underlying error.
    #[source]
    source: io::Error,
}

/// Writes the recommended records of `payload` below `dir`.
///
/// Returns the number of files written. Types without records still get an empty
/// folder; existing files with the same names are replaced.
pub fn export_recommendations(payload: &CompletePayload, dir: &Path) -> Result<usize, ExportError> {
    let mut written = 0;
    for kind in ResourceKind::ALL {
        let folder = dir.join(kind.as_str());
        fs::create_dir_all(&folder).map_err(|source| ExportError {
            path: folder.clone(),
            source,
        })?;
        let records = payload
            .recommended_resources
            .get(&kind)
            .map_or(&[][..], Vec::as_slice);
        for (i, record) in records.iter().enumerate() {
            let path = folder.join(format!("{}_{}.txt", i + 1, file_stem(record.title())));
            fs::write(&path, render(record)).map_err(|source| ExportError {
                path: path.clone(),
                source,
            })?;
            debug!("wrote {}", path.display());
            written += 1;
        }
    }
    Ok(written)
}

/// File-name form of a title: path and shell metacharacters become `_`.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
                '_'
            } else {
                c
            }
        })
        .take(MAX_FILE_STEM_CHARS)
        .collect();
    if stem.is_empty() { "resource".to_string() } else { stem }
}

/// The file contents for one record.
fn render(record: &ResourceRecord) -> String {
    let resource = record.resource();
    let mut lines = vec![
        format!("Title: {}", record.title()),
        format!("URL: {}", record.url()),
        format!("Source: {}", resource.source()),
        format!("Similarity Score: {:.4}", record.similarity()),
        format!("Keywords: {}", record.matched_keywords().join(", ")),
    ];
    if let Some(summary) = record.summary() {
        lines.push(format!("Summary: {}", summary.text));
    }

    match resource.detail() {
        ResourceDetail::Text { content } => {
            lines.extend([String::new(), RULE.to_string(), String::new(), content.clone()]);
        }
        ResourceDetail::Video {
            description,
            thumbnail,
            ..
        } => {
            lines.push(format!("Description: {description}"));
            lines.extend(thumbnail.iter().map(|t| format!("Thumbnail: {t}")));
        }
        ResourceDetail::Code {
            description,
            stars,
            language,
        } => {
            lines.push(format!("Description: {description}"));
            lines.extend(language.iter().map(|l| format!("Language: {l}")));
            lines.extend(stars.iter().map(|n| format!("Stars: {n}")));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use scout_resource::{KindStats, RawHit, Resource, Summary, SummaryKind};

    use super::*;

    fn record(title: &str, url: &str, detail: ResourceDetail, score: f64) -> ResourceRecord {
        let resource = Resource::try_from(RawHit {
            title: title.to_string(),
            url: url.to_string(),
            source: "Test".to_string(),
            detail,
        })
        .unwrap();
        ResourceRecord::new(resource, score, "graph neural network")
    }

    fn payload() -> CompletePayload {
        let mut article = record(
            "Graph neural network",
            "https://en.wikipedia.org/wiki/Graph_neural_network",
            ResourceDetail::Text {
                content: "A graph neural network operates on graphs.".to_string(),
            },
            0.81234,
        );
        article.set_summary(Summary {
            text: "Encyclopedia article about Graph neural network.".to_string(),
            kind: SummaryKind::WikiStub,
        });
        let repo = record(
            "pyg-team/pytorch_geometric",
            "https://github.com/pyg-team/pytorch_geometric",
            ResourceDetail::Code {
                description: "Graph neural network library".to_string(),
                stars: Some(21000),
                language: Some("Python".to_string()),
            },
            0.5,
        );
        CompletePayload {
            keywords: vec!["graph neural network".to_string()],
            stats: BTreeMap::from([(ResourceKind::Text, KindStats::default())]),
            recommended_resources: BTreeMap::from([
                (ResourceKind::Text, vec![article]),
                (ResourceKind::Code, vec![repo]),
            ]),
        }
    }

    #[test]
    fn writes_one_file_per_record_under_type_folders() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_recommendations(&payload(), dir.path()).unwrap();
        assert_eq!(written, 2);

        let article = fs::read_to_string(dir.path().join("text").join("1_Graph neural network.txt")).unwrap();
        assert!(article.starts_with("Title: Graph neural network\n"), "{article}");
        assert!(article.contains("URL: https://en.wikipedia.org/wiki/Graph_neural_network\n"));
        assert!(article.contains("Source: Test\n"));
        assert!(article.contains("Similarity Score: 0.8123\n"));
        assert!(article.contains("Keywords: graph neural network\n"));
        assert!(article.contains("Summary: Encyclopedia article about Graph neural network.\n"));
        assert!(article.ends_with("A graph neural network operates on graphs.\n"));

        let repo = fs::read_to_string(dir.path().join("code").join("1_pyg-team_pytorch_geometric.txt")).unwrap();
        assert!(repo.contains("Stars: 21000\n"));
        assert!(repo.contains("Language: Python\n"));
        assert!(!repo.contains(RULE));

        let videos: Vec<_> = fs::read_dir(dir.path().join("video")).unwrap().collect();
        assert!(videos.is_empty());
    }

    #[test]
    fn file_stems_are_safe() {
        assert_eq!(file_stem("C/C++: a \"guide\"?"), "C_C++_ a _guide__");
        assert_eq!(file_stem("   "), "resource");
        assert_eq!(file_stem(&"x".repeat(300)).len(), MAX_FILE_STEM_CHARS);
    }

    #[test]
    fn unwritable_target_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        fs::write(&blocker, "not a folder").unwrap();
        let err = export_recommendations(&payload(), &blocker).unwrap_err();
        assert!(err.to_string().starts_with("failed to write"), "{err}");
    }
}
