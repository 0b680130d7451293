//! Rendering and JSON serialization for CLI output.

mod style;

use std::process::ExitCode;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use scout_keywords::{CandidateTerm, Keyword};
use scout_pipeline::{CompletePayload, ProgressEvent, Step};
use scout_resource::{ResourceDetail, ResourceKind, ResourceRecord, SummaryKind};
use serde::Serialize;

pub use self::style::{Highlighter, dim, header, indent, subheader, success, warning};

/// Longest title shown in a recommendation table.
const MAX_TITLE_CHARS: usize = 60;

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints one event as a single JSON line.
pub fn print_event_json(event: &ProgressEvent) -> Result<(), serde_json::Error> {
    let line = serde_json::to_string(event)?;
    println!("{line}");
    Ok(())
}

/// Formats one event as a human-readable progress line.
pub fn format_event(event: &ProgressEvent) -> String {
    let progress = event
        .progress
        .map_or_else(|| "    ".to_string(), |p| format!("{p:>3}%"));
    let message = event.message.as_deref().unwrap_or_default();
    let line = format!("[{progress}] {message}");
    match event.step {
        Step::Error => warning(&line),
        Step::Complete => success(&line),
        Step::KeywordStart => line,
        _ => dim(&line),
    }
}

/// Builds the table of selected keywords.
pub fn keyword_table(keywords: &[Keyword]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Keyword", "TF-IDF", "Boost", "Combined", "Relevance", "Docs"]);
    for (i, kw) in keywords.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&kw.term),
            score_cell(kw.tfidf),
            score_cell(kw.boost),
            score_cell(kw.combined),
            score_cell(kw.relevance),
            Cell::new(kw.df).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Builds the table of every scored candidate.
pub fn candidate_table(candidates: &[CandidateTerm]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Term", "TF-IDF", "Boost", "Combined", "Docs"]);
    for candidate in candidates {
        table.add_row(vec![
            Cell::new(&candidate.term),
            score_cell(candidate.tfidf),
            score_cell(candidate.boost),
            score_cell(candidate.combined),
            Cell::new(candidate.df).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Prints the keywords, per-type statistics and recommendation tables of a finished run.
pub fn print_recommendations(payload: &CompletePayload) {
    println!();
    println!("{}", subheader("Keywords:"));
    println!("  {}", payload.keywords.join(", "));

    for kind in ResourceKind::ALL {
        let stats = payload.stats.get(&kind).copied().unwrap_or_default();
        let records = payload
            .recommended_resources
            .get(&kind)
            .map_or(&[][..], Vec::as_slice);

        println!();
        println!(
            "{} {}",
            header(kind_heading(kind)),
            dim(&format!(
                "({} found, {} recommended)",
                stats.found, stats.recommended
            ))
        );
        if records.is_empty() {
            println!("  {}", dim("No recommendations."));
            continue;
        }
        println!("{}", recommendation_table(records));
        print_summaries(records);
    }
}

/// Builds the table for one resource type.
fn recommendation_table(records: &[ResourceRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Title", "Score", "Keywords", "Link"]);
    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(title_with_detail(record)),
            score_cell(record.similarity()),
            Cell::new(record.matched_keywords().join(", ")),
            Cell::new(record.url()),
        ]);
    }
    table
}

/// Prints the summaries attached to `records`, numbered like the table rows.
fn print_summaries(records: &[ResourceRecord]) {
    for (i, record) in records.iter().enumerate() {
        let Some(summary) = record.summary() else {
            continue;
        };
        let tag = match summary.kind {
            SummaryKind::AiGenerated => "ai",
            SummaryKind::Abstract => "abstract",
            SummaryKind::WikiStub => "stub",
        };
        println!("  {}. {} {}", i + 1, summary.text, dim(&format!("[{tag}]")));
    }
}

/// Title with the platform detail worth showing in a table.
fn title_with_detail(record: &ResourceRecord) -> String {
    let title = truncate(record.title(), MAX_TITLE_CHARS);
    match record.resource().detail() {
        ResourceDetail::Code {
            stars: Some(stars),
            language,
            ..
        } => match language {
            Some(language) => format!("{title} ({language}, {stars} stars)"),
            None => format!("{title} ({stars} stars)"),
        },
        _ => title,
    }
}

/// Display heading for a resource type.
fn kind_heading(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Text => "Articles",
        ResourceKind::Video => "Videos",
        ResourceKind::Code => "Repositories",
    }
}

/// Right-aligned cell with two decimals.
fn score_cell(score: f64) -> Cell {
    Cell::new(format!("{score:.2}")).set_alignment(CellAlignment::Right)
}

/// Creates an empty table in the shared style.
fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Shortens `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
