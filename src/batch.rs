//! Upload a batch: build the client, run the pipeline, print results as they complete.

use anyhow::{Result, bail};
use log::{debug, info};
use std::io::{self, Write};
use std::sync::Arc;

use crate::engine::client::{ApiClient, Uploader};
use crate::engine::display::write_result;
use crate::pipeline::{Diagnostics, Pipeline, PipelineTuning, RunReport};
use crate::utils::Colors;
use crate::{Opts, WorkItem};

/// Upload `items` with the production HTTP client, printing results to stdout and per-item
/// errors to stderr.
pub fn run_batch(items: Vec<WorkItem>, opts: &Opts) -> Result<RunReport> {
    let client = ApiClient::new(opts)?;
    debug!("endpoint: {}", client.endpoint());
    let stdout = io::stdout();
    let report = run_batch_with(
        items,
        opts,
        Arc::new(client),
        &mut stdout.lock(),
        Box::new(io::stderr()),
    )?;
    finish(&report)?;
    Ok(report)
}

/// Same as [`run_batch`] with an injected uploader and output streams.
pub fn run_batch_with<W: Write>(
    items: Vec<WorkItem>,
    opts: &Opts,
    uploader: Arc<dyn Uploader>,
    out: &mut W,
    diagnostics: Diagnostics,
) -> Result<RunReport> {
    let pipeline = Pipeline::new(PipelineTuning::new(opts.workers), uploader);
    pipeline.run(
        items,
        |result| {
            if write_result(out, result, &opts.variants).is_err() {
                debug!("stdout closed; dropping output for {}", result.reference);
            }
        },
        diagnostics,
    )
}

/// Summarize and turn batch-level failures into an error (non-zero exit).
fn finish(report: &RunReport) -> Result<()> {
    if let Some(reference) = &report.aborted {
        bail!(
            "batch aborted at {}: the API key was refused (access forbidden)",
            reference
        );
    }
    if report.submitted > 0 && report.uploaded == 0 {
        bail!("all {} uploads failed", report.submitted);
    }
    if report.failed > 0 {
        info!(
            "{} uploaded, {}",
            report.uploaded,
            Colors::colorize(Colors::ERROR, &format!("{} failed", report.failed))
        );
    } else {
        debug!("{} uploaded", report.uploaded);
    }
    Ok(())
}
