//! Implementation of `scout run`.

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use log::{debug, info};
use scout_config::KNOWN_PLATFORMS;
use scout_pipeline::{InputDocument, ProgressEvent, RunContext, RunRequest, Step, spawn_run};
use scout_resource::DisplayCounts;
use tokio::{runtime, signal};

use crate::cli::{
    args::RunCommand,
    context::CommandContext,
    documents::load_documents,
    export::export_recommendations,
    output::{dim, format_event, print_event_json, print_recommendations},
};

/// Runs the full pipeline over documents, streaming progress and printing recommendations.
pub fn run(ctx: &CommandContext, cmd: &RunCommand) -> ExitCode {
    if let Some(unknown) = cmd
        .platforms
        .iter()
        .find(|p| !KNOWN_PLATFORMS.contains(&p.as_str()))
    {
        eprintln!(
            "error: unknown platform '{unknown}' (expected one of: {})",
            KNOWN_PLATFORMS.join(", ")
        );
        return ExitCode::FAILURE;
    }

    let paths: Vec<PathBuf> = cmd.extract.paths.iter().map(|p| ctx.resolve(p)).collect();
    let documents = match load_documents(&paths) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let run_ctx = match RunContext::from_config(&ctx.config) {
        Ok(run_ctx) => Arc::new(run_ctx),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let request = build_request(cmd, documents);
    debug!("{request:?}");
    let export_dir = cmd.output.as_ref().map(|dir| ctx.resolve(dir));
    runtime.block_on(stream_run(run_ctx, request, cmd.extract.json, export_dir))
}

/// Maps command-line flags onto a run request; unset flags defer to configuration.
fn build_request(cmd: &RunCommand, documents: Vec<InputDocument>) -> RunRequest {
    RunRequest {
        documents,
        language: cmd.extract.language.clone(),
        keyword_count: cmd.extract.keywords,
        lambda: cmd.extract.lambda,
        display: cmd.show.map(DisplayCounts::uniform),
        platforms: (!cmd.platforms.is_empty()).then(|| cmd.platforms.clone()),
        summaries: cmd.no_summary.then_some(false),
        credential: cmd.openai_key.clone(),
    }
}

/// Spawns the run and reports its events until the stream ends or the user interrupts.
///
/// A successful run is also written below `export_dir` when one is given.
async fn stream_run(
    ctx: Arc<RunContext>,
    request: RunRequest,
    json: bool,
    export_dir: Option<PathBuf>,
) -> ExitCode {
    let (handle, mut events) = spawn_run(ctx, request);
    let interrupt = signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut status = ExitCode::FAILURE;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                if event.step == Step::Complete {
                    status = ExitCode::SUCCESS;
                }
                if let Err(e) = report(&event, json) {
                    eprintln!("error: failed to write event: {e}");
                    handle.cancel();
                    return ExitCode::FAILURE;
                }
            }
            Ok(()) = &mut interrupt => {
                eprintln!("interrupted");
                handle.cancel();
                return ExitCode::FAILURE;
            }
        }
    }

    let output = handle.wait().await;
    if let (Some(dir), Some(output)) = (export_dir, output) {
        match export_recommendations(&output.payload, &dir) {
            Ok(written) => {
                info!("exported {written} recommendations to {}", dir.display());
                if !json {
                    eprintln!("{}", dim(&format!("Wrote {written} files to {}", dir.display())));
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    status
}

/// Prints one event: a JSON line, or a progress line on stderr with the results on stdout.
fn report(event: &ProgressEvent, json: bool) -> Result<(), serde_json::Error> {
    if json {
        return print_event_json(event);
    }
    match event.step {
        Step::Error => {
            eprintln!(
                "error: {}",
                event.message.as_deref().unwrap_or("run failed")
            );
        }
        Step::Complete => {
            eprintln!("{}", format_event(event));
            if let Some(payload) = event.payload() {
                print_recommendations(payload);
            }
        }
        _ => eprintln!("{}", format_event(event)),
    }
    Ok(())
}
