//! Pipeline components: queues, worker pools, feed, error sink, orchestrator.

pub mod context;
pub mod error_handler;
pub mod feed;
pub mod orchestrator;
pub mod pool;

pub use context::{Collected, PipelineChannels, PipelineTuning, create_pipeline_channels};
pub use error_handler::{Diagnostics, drain_errors, spawn_error_sink};
pub use feed::{FeedOutcome, run_feed, spawn_feed_thread};
pub use orchestrator::{Pipeline, RunPhase, RunReport};
pub use pool::WorkerPool;
