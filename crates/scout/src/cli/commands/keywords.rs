//! Implementation of `scout keywords`.

use std::{path::PathBuf, process::ExitCode};

use scout_keywords::{CandidateTerm, Corpus, Keyword};
use scout_pipeline::{InputError, RunContext};
use serde::Serialize;

use crate::cli::{
    args::KeywordsCommand,
    context::CommandContext,
    documents::load_documents,
    output::{candidate_table, dim, keyword_table, print_json, subheader},
};

/// JSON output for `scout keywords`.
#[derive(Serialize)]
struct JsonKeywords<'a> {
    /// Number of documents read.
    documents: usize,
    /// Selected keywords in selection order.
    keywords: &'a [Keyword],
    /// Every scored candidate, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<&'a [CandidateTerm]>,
}

/// Extracts keywords from documents without searching any platform.
pub fn run(ctx: &CommandContext, cmd: &KeywordsCommand) -> ExitCode {
    let args = &cmd.extract;
    let paths: Vec<PathBuf> = args.paths.iter().map(|p| ctx.resolve(p)).collect();
    let documents = match load_documents(&paths) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if documents.is_empty() {
        eprintln!("error: no .txt or .md documents found");
        return ExitCode::FAILURE;
    }

    let run_ctx = match RunContext::from_config(&ctx.config) {
        Ok(run_ctx) => run_ctx,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let extractor = run_ctx.extractor(args.keywords, args.lambda);
    if extractor.settings().count == 0 {
        eprintln!("error: {}", InputError::ZeroKeywords);
        return ExitCode::FAILURE;
    }
    if args.lambda.is_some_and(|lambda| !(lambda > 0.0 && lambda <= 1.0)) {
        eprintln!("error: {}", InputError::InvalidLambda);
        return ExitCode::FAILURE;
    }

    let normalizer = run_ctx.normalizer(args.language.as_deref());
    let document_count = documents.len();
    let corpus = Corpus::new(
        documents
            .into_iter()
            .map(|doc| normalizer.normalize(doc.id, doc.text))
            .collect(),
    );
    if corpus.non_empty_len() == 0 {
        eprintln!("error: {}", InputError::NoContent);
        return ExitCode::FAILURE;
    }

    let extraction = extractor.extract(&corpus);
    if extraction.is_empty() {
        eprintln!("error: {}", InputError::NoKeywords);
        return ExitCode::FAILURE;
    }

    if args.json {
        return print_json(&JsonKeywords {
            documents: document_count,
            keywords: &extraction.keywords,
            candidates: cmd.candidates.then_some(extraction.candidates.as_slice()),
        });
    }

    println!(
        "{} {}",
        subheader("Keywords"),
        dim(&format!(
            "({document_count} documents, {} terms)",
            corpus.vocabulary_len()
        ))
    );
    println!("{}", keyword_table(&extraction.keywords));

    if cmd.candidates {
        println!();
        println!("{}", subheader("Candidates"));
        println!("{}", candidate_table(&extraction.candidates));
    }

    ExitCode::SUCCESS
}
