//! pstorage: validate local images or image URLs and upload them concurrently to the pstorage host.

pub mod batch;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::PipelineError;
pub use types::*;

pub use batch::{run_batch, run_batch_with};
pub use pipeline::{Pipeline, PipelineTuning, RunReport};

/// Result alias used by public pstorage API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
