use anyhow::{Result, anyhow};
use log::debug;
use std::sync::Arc;

use crate::engine::client::Uploader;
use crate::engine::validator::validate;
use crate::pipeline::{
    Collected, Diagnostics, PipelineChannels, PipelineTuning, WorkerPool,
    create_pipeline_channels, spawn_error_sink, spawn_feed_thread,
};
use crate::{UploadResult, ValidatedItem, WorkItem};

/// Lifecycle of one run. Stages overlap in time; this is the order in which they start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Validating,
    Uploading,
    Collecting,
    Done,
}

fn enter(phase: &mut RunPhase, next: RunPhase) {
    debug!("pipeline: {:?} -> {:?}", phase, next);
    *phase = next;
}

/// Outcome counts of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Items accepted into the validation queue.
    pub submitted: usize,
    /// Results handed to the display callback.
    pub uploaded: usize,
    /// Errors written by the error sink (including the fatal one, if any).
    pub failed: usize,
    /// Reference of the item whose upload was refused with access-forbidden.
    pub aborted: Option<String>,
}

impl RunReport {
    /// Every submitted item produced exactly one outcome.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.uploaded + self.failed == self.submitted
    }
}

/// Two-stage upload pipeline: validators → valid-item queue → uploaders → collector, with a
/// per-run error sink. Holds no per-run state; each [`Pipeline::run`] builds fresh queues.
pub struct Pipeline {
    tuning: PipelineTuning,
    uploader: Arc<dyn Uploader>,
}

impl Pipeline {
    pub fn new(tuning: PipelineTuning, uploader: Arc<dyn Uploader>) -> Self {
        Self { tuning, uploader }
    }

    /// Run `items` through validation and upload. `on_result` is called on this thread for each
    /// accepted upload in completion order; per-item errors go to `diagnostics`.
    ///
    /// On access-forbidden the collector stops at once: the triggering item is reported, no further
    /// result or upload error is passed on, and uploads still in flight are discarded. Each upload
    /// worker makes at most one more call; later diagnostics are dropped by the sink.
    pub fn run<F>(
        &self,
        items: Vec<WorkItem>,
        mut on_result: F,
        diagnostics: Diagnostics,
    ) -> Result<RunReport>
    where
        F: FnMut(&UploadResult),
    {
        let mut phase = RunPhase::Idle;
        let workers = self.tuning.workers;
        debug!(
            "pipeline: {} items, {} workers per stage, queue cap {}",
            items.len(),
            workers,
            self.tuning.queue_cap
        );

        let PipelineChannels {
            work_tx,
            work_rx,
            valid_tx,
            valid_rx,
            result_tx,
            result_rx,
            error_tx,
            error_rx,
        } = create_pipeline_channels(&self.tuning);
        let sink = spawn_error_sink(error_rx, diagnostics);

        enter(&mut phase, RunPhase::Validating);
        let validators = WorkerPool::spawn(
            "validate",
            workers,
            &work_rx,
            &valid_tx,
            &error_tx,
            |item: WorkItem| validate(&item),
        )?;
        drop(work_rx);

        enter(&mut phase, RunPhase::Uploading);
        let uploader = Arc::clone(&self.uploader);
        let uploaders = WorkerPool::spawn(
            "upload",
            workers,
            &valid_rx,
            &result_tx,
            &error_tx,
            // Every upload outcome goes through the result queue, so dropping it stops the stage.
            move |item: ValidatedItem| {
                Ok(match uploader.upload(&item) {
                    Ok(r) => Collected::Uploaded(r),
                    Err(e) if e.is_fatal() => Collected::Fatal(e),
                    Err(e) => Collected::Failed(e),
                })
            },
        )?;
        // Only workers hold these now; their exit closes the downstream queues.
        drop(valid_rx);
        drop(result_tx);

        let feed = spawn_feed_thread(items, work_tx, validators, valid_tx);

        enter(&mut phase, RunPhase::Collecting);
        let mut uploaded = 0_usize;
        let mut aborted = None;
        while let Ok(collected) = result_rx.recv() {
            match collected {
                Collected::Uploaded(result) => {
                    uploaded += 1;
                    on_result(&result);
                }
                Collected::Failed(err) => {
                    let _ = error_tx.send(err);
                }
                Collected::Fatal(err) => {
                    aborted = Some(err.reference().to_string());
                    let _ = error_tx.send(err);
                    break;
                }
            }
        }
        // Closing the result queue unwinds the stages: uploaders fail their next send and exit,
        // then validators and the feed see disconnected queues.
        drop(result_rx);

        let upload_taken = uploaders.join()?;
        let fed = feed
            .join()
            .map_err(|_| anyhow!("feed thread panicked"))??;
        drop(error_tx);
        let failed = sink
            .join()
            .map_err(|_| anyhow!("error sink panicked"))?;
        enter(&mut phase, RunPhase::Done);
        debug!(
            "pipeline: submitted {}, validated {}, upload attempts {}, uploaded {}, failed {}",
            fed.submitted, fed.validated, upload_taken, uploaded, failed
        );

        Ok(RunReport {
            submitted: fed.submitted,
            uploaded,
            failed,
            aborted,
        })
    }
}
