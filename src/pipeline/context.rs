//! Pipeline queues and tuning: the bounded hand-off channels owned by one run.

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::error::PipelineError;
use crate::utils::config::{QUEUE_SLOTS_PER_WORKER, WorkerPoolLimits};
use crate::{UploadResult, ValidatedItem, WorkItem};

/// Worker count per stage and queue capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub workers: usize,
    /// Capacity of the work, valid-item and result queues.
    pub queue_cap: usize,
}

impl PipelineTuning {
    /// Clamp `workers` into the allowed range and size queues from it.
    pub fn new(workers: usize) -> Self {
        let workers = workers.clamp(WorkerPoolLimits::MIN_WORKERS, WorkerPoolLimits::MAX_WORKERS);
        Self {
            workers,
            queue_cap: workers * QUEUE_SLOTS_PER_WORKER,
        }
    }
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self::new(WorkerPoolLimits::DEFAULT_WORKERS)
    }
}

/// What the upload stage hands to the collector. Upload errors travel here rather than straight
/// to the error sink: once the collector stops reading, every upload worker fails its next send.
#[derive(Debug)]
pub enum Collected {
    Uploaded(UploadResult),
    /// Per-item failure; forwarded to the error sink by the collector.
    Failed(PipelineError),
    Fatal(PipelineError),
}

/// Channels for one run. Feed gets `work_tx`; validators get `work_rx`, `valid_tx`; uploaders get
/// `valid_rx`, `result_tx`; both pools get clones of `error_tx`; the sink gets `error_rx`.
pub struct PipelineChannels {
    pub work_tx: Sender<WorkItem>,
    pub work_rx: Receiver<WorkItem>,
    pub valid_tx: Sender<ValidatedItem>,
    pub valid_rx: Receiver<ValidatedItem>,
    pub result_tx: Sender<Collected>,
    pub result_rx: Receiver<Collected>,
    pub error_tx: Sender<PipelineError>,
    pub error_rx: Receiver<PipelineError>,
}

/// Fresh queues for a run. The error stream is unbounded: the sink never blocks a worker.
pub fn create_pipeline_channels(tuning: &PipelineTuning) -> PipelineChannels {
    let (work_tx, work_rx) = bounded::<WorkItem>(tuning.queue_cap);
    let (valid_tx, valid_rx) = bounded::<ValidatedItem>(tuning.queue_cap);
    let (result_tx, result_rx) = bounded::<Collected>(tuning.queue_cap);
    let (error_tx, error_rx) = crossbeam_channel::unbounded::<PipelineError>();
    PipelineChannels {
        work_tx,
        work_rx,
        valid_tx,
        valid_rx,
        result_tx,
        result_rx,
        error_tx,
        error_rx,
    }
}
