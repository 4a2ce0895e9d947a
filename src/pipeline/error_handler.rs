use crossbeam_channel::Receiver;
use std::io::Write;
use std::thread::{self, JoinHandle};

use crate::error::PipelineError;

/// Diagnostic writer shared between the sink thread and its creator.
pub type Diagnostics = Box<dyn Write + Send>;

/// Drain `error_rx`, writing one line per error as it arrives (flushed, not batched).
/// Errors arriving after a fatal one are drained but not written.
/// Returns the number of errors written once every sender is dropped.
pub fn drain_errors(error_rx: Receiver<PipelineError>, out: &mut dyn Write) -> usize {
    let mut count = 0_usize;
    let mut aborted = false;
    while let Ok(err) = error_rx.recv() {
        if aborted {
            continue;
        }
        aborted = err.is_fatal();
        count += 1;
        if writeln!(out, "{}", err).and_then(|_| out.flush()).is_err() {
            // Diagnostic stream gone (closed pipe); keep draining so workers never block.
            log::debug!("error sink: write failed for {}", err.reference());
        }
    }
    count
}

/// Spawn the per-run error sink. Lives until the orchestrator drops the last error sender.
pub fn spawn_error_sink(
    error_rx: Receiver<PipelineError>,
    mut out: Diagnostics,
) -> JoinHandle<usize> {
    thread::spawn(move || drain_errors(error_rx, out.as_mut()))
}
