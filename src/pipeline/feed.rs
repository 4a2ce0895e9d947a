//! Submission thread: pushes work items into the validation queue, then closes the stage boundary.

use anyhow::Result;
use crossbeam_channel::Sender;
use log::debug;
use std::thread::{self, JoinHandle};

use crate::{ValidatedItem, WorkItem};

use super::pool::WorkerPool;

/// What the feed thread observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedOutcome {
    /// Items accepted by the validation queue.
    pub submitted: usize,
    /// Items taken by validation workers (equals `submitted` unless the run aborted).
    pub validated: usize,
}

/// Spawn the feed thread. It owns the last `valid_tx`, so the valid-item queue closes only after
/// every validator has finished; uploaders never see a premature end-of-stream.
pub fn spawn_feed_thread(
    items: Vec<WorkItem>,
    work_tx: Sender<WorkItem>,
    validators: WorkerPool,
    valid_tx: Sender<ValidatedItem>,
) -> JoinHandle<Result<FeedOutcome>> {
    thread::spawn(move || run_feed(items, work_tx, validators, valid_tx))
}

/// Submit `items` in order, close the work queue, join validators, then close the valid queue.
/// Stops submitting early when the validation queue is disconnected (run aborted downstream).
pub fn run_feed(
    items: Vec<WorkItem>,
    work_tx: Sender<WorkItem>,
    validators: WorkerPool,
    valid_tx: Sender<ValidatedItem>,
) -> Result<FeedOutcome> {
    let mut submitted = 0_usize;
    for item in items {
        if work_tx.send(item).is_err() {
            break;
        }
        submitted += 1;
    }
    drop(work_tx);
    debug!("feed: {} items submitted, validation queue closed", submitted);

    let validated = validators.join()?;
    drop(valid_tx);
    debug!("feed: validation stage drained, valid-item queue closed");

    Ok(FeedOutcome {
        submitted,
        validated,
    })
}
