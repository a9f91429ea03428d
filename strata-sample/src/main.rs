//! Averages every image in a directory into one composite PNG.
//!
//! The run is one pipeline:
//!
//! ```text
//! load ─(frames non-empty)→ reduce ─(has composite)→ display
//!    └─ otherwise ─────────────┴─ otherwise ──→ cancelled notice
//! ```
//!
//! Ctrl-C requests cooperative cancellation; the process always reports
//! the pipeline's terminal outcome.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use strata_flow::{
    propagate, propagate_all, spawn, CancelSignal, Envelope, Outcome, Pipeline, Router,
    StageComponent, StageError, StageFuture, StageOptions, Transform,
};
use strata_io::{load_frames, save_png, LoadError};
use strata_raster::{composite, Buffer2D, CompositeError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "strata-sample",
    about = "Average a directory of images into one composite"
)]
struct Args {
    /// Directory containing the source images.
    input: PathBuf,

    /// Where to write the composite PNG.
    #[arg(short, long, default_value = "composite.png")]
    output: PathBuf,
}

/// What flows between stages; [`Envelope::Empty`] is the "no result, but
/// not a fault" sentinel routed to the cancelled consumer.
type Item = Envelope<Payload>;

#[derive(Debug, Clone)]
enum Payload {
    Dir(PathBuf),
    Frames(Vec<Buffer2D>),
    Composite(Buffer2D),
}

/// Expands the input directory into the list of decoded frames.
struct LoadStage;

impl StageComponent for LoadStage {
    type Input = Item;
    type Output = Item;
}

impl Transform for LoadStage {
    fn apply(&self, input: Item, cancel: &CancelSignal) -> StageFuture<'_, Vec<Item>> {
        let cancel = cancel.clone();
        Box::pin(async move {
            let Envelope::Payload(Payload::Dir(dir)) = input else {
                return Err(StageError::InternalInvariantViolation(
                    "load stage expects a directory path".to_string(),
                ));
            };
            match load_frames(&dir, &cancel).await {
                Ok(frames) => {
                    info!(frames = frames.len(), "directory loaded");
                    Ok(vec![Envelope::Payload(Payload::Frames(frames))])
                }
                Err(LoadError::Cancelled) => Ok(vec![Envelope::Empty]),
                Err(e) => Err(StageError::Faulted(e.to_string())),
            }
        })
    }
}

/// Folds the frame list into one averaged composite.
struct ReduceStage;

impl StageComponent for ReduceStage {
    type Input = Item;
    type Output = Item;
}

impl Transform for ReduceStage {
    fn apply(&self, input: Item, cancel: &CancelSignal) -> StageFuture<'_, Vec<Item>> {
        let cancel = cancel.clone();
        Box::pin(async move {
            let Envelope::Payload(Payload::Frames(frames)) = input else {
                return Err(StageError::InternalInvariantViolation(
                    "reduce stage expects a frame list".to_string(),
                ));
            };
            let reduced = tokio::task::spawn_blocking(move || composite(&frames, &cancel))
                .await
                .map_err(|e| StageError::Faulted(e.to_string()))?;
            match reduced {
                Ok(buffer) => Ok(vec![Envelope::Payload(Payload::Composite(buffer))]),
                Err(CompositeError::Cancelled) => Ok(vec![Envelope::Empty]),
                Err(e) => Err(StageError::from(e)),
            }
        })
    }
}

/// Writes the composite out; the "display" consumer.
struct DisplayStage {
    output: PathBuf,
}

impl StageComponent for DisplayStage {
    type Input = Item;
    type Output = Item;
}

impl Transform for DisplayStage {
    fn apply(&self, input: Item, _cancel: &CancelSignal) -> StageFuture<'_, Vec<Item>> {
        let output = self.output.clone();
        Box::pin(async move {
            let Envelope::Payload(Payload::Composite(buffer)) = input else {
                return Err(StageError::InternalInvariantViolation(
                    "display stage expects a composite".to_string(),
                ));
            };
            save_png(&buffer, &output)
                .await
                .map_err(|e| StageError::Faulted(e.to_string()))?;
            info!(
                path = %output.display(),
                width = buffer.width(),
                height = buffer.height(),
                "composite written"
            );
            Ok(Vec::new())
        })
    }
}

/// Receives empty or cancelled runs; the same treatment either way.
struct CancelledStage;

impl StageComponent for CancelledStage {
    type Input = Item;
    type Output = Item;
}

impl Transform for CancelledStage {
    fn apply(&self, _input: Item, _cancel: &CancelSignal) -> StageFuture<'_, Vec<Item>> {
        Box::pin(async move {
            warn!("run ended without a composite");
            Ok(Vec::new())
        })
    }
}

fn build_pipeline(output: PathBuf) -> Pipeline<Item> {
    let cancel = CancelSignal::new();
    let options = StageOptions::default();

    let display = spawn(
        "display",
        DisplayStage { output },
        Router::new(),
        cancel.clone(),
        options.clone(),
    );
    let cancelled = spawn(
        "cancelled",
        CancelledStage,
        Router::new(),
        cancel.clone(),
        options.clone(),
    );
    let reduce = spawn(
        "reduce",
        ReduceStage,
        Router::new()
            .when(
                |item: &Item| matches!(item, Envelope::Payload(Payload::Composite(_))),
                display.clone(),
            )
            .otherwise(cancelled.clone()),
        cancel.clone(),
        options.clone(),
    );
    let load = spawn(
        "load",
        LoadStage,
        Router::new()
            .when(
                |item: &Item| {
                    matches!(item, Envelope::Payload(Payload::Frames(frames)) if !frames.is_empty())
                },
                reduce.clone(),
            )
            .otherwise(cancelled.clone()),
        cancel.clone(),
        options,
    );

    propagate(&load, &reduce);
    propagate(&reduce, &display);
    // the cancelled consumer hears from both producers
    propagate_all(vec![load.completion(), reduce.completion()], &cancelled);

    let completions = vec![
        load.completion(),
        reduce.completion(),
        display.completion(),
        cancelled.completion(),
    ];
    Pipeline::new(load, completions, cancel)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let pipeline = Arc::new(build_pipeline(args.output));

    {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("cancellation requested");
                pipeline.cancel();
            }
        });
    }

    let input = Envelope::Payload(Payload::Dir(args.input));
    match pipeline.run(input).await {
        Ok(Outcome::Succeeded) => {
            info!("run completed");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Cancelled) => {
            warn!("run cancelled");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Faulted(e)) => {
            error!(error = %e, "run faulted");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "pipeline refused to run");
            ExitCode::FAILURE
        }
    }
}
