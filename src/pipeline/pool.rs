//! Fixed-size worker pool for one pipeline stage.

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::PipelineError;

/// Handles of one stage's workers. Joining is the stage boundary: every in-flight item of the
/// stage has been routed once [`WorkerPool::join`] returns.
pub struct WorkerPool {
    name: &'static str,
    handles: Vec<JoinHandle<usize>>,
}

/// Single worker: take items from `rx`, run `f`, route `Ok` to `ok_tx` and `Err` to `err_tx`.
/// Exits when `rx` is closed and drained, or when a downstream receiver is gone.
/// Returns the number of items taken.
fn stage_worker_loop<I, O, F>(
    rx: Receiver<I>,
    ok_tx: Sender<O>,
    err_tx: Sender<PipelineError>,
    f: &F,
) -> usize
where
    F: Fn(I) -> Result<O, PipelineError>,
{
    let mut taken = 0_usize;
    while let Ok(item) = rx.recv() {
        taken += 1;
        let delivered = match f(item) {
            Ok(out) => ok_tx.send(out).is_ok(),
            Err(e) => err_tx.send(e).is_ok(),
        };
        if !delivered {
            break;
        }
    }
    taken
}

impl WorkerPool {
    /// Spawn `size` workers running `f` over `rx`. Each worker holds its own sender clones; the
    /// caller drops its copies after this so downstream channels close when the pool exits.
    pub fn spawn<I, O, F>(
        name: &'static str,
        size: usize,
        rx: &Receiver<I>,
        ok_tx: &Sender<O>,
        err_tx: &Sender<PipelineError>,
        f: F,
    ) -> Result<Self>
    where
        I: Send + 'static,
        O: Send + 'static,
        F: Fn(I) -> Result<O, PipelineError> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let handles = (0..size)
            .map(|i| {
                let rx = rx.clone();
                let ok_tx = ok_tx.clone();
                let err_tx = err_tx.clone();
                let f = Arc::clone(&f);
                thread::Builder::new()
                    .name(format!("{name}-{i}"))
                    .spawn(move || stage_worker_loop(rx, ok_tx, err_tx, f.as_ref()))
                    .with_context(|| format!("spawn {name} worker"))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("{name}: spawned {size} workers");
        Ok(WorkerPool { name, handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker. Returns total items taken by the stage.
    pub fn join(self) -> Result<usize> {
        let mut total = 0_usize;
        for h in self.handles {
            total += h
                .join()
                .map_err(|_| anyhow!("{} worker panicked", self.name))?;
        }
        debug!("{}: all workers done, {} items", self.name, total);
        Ok(total)
    }
}
