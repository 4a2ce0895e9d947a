//! Engine: leaf operations (validate, upload, display) and the CLI surface.

pub mod arg_parser;
pub mod cli;
pub mod client;
pub mod display;
pub mod validator;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, VariantArgs};
pub use cli::{handle_run, setup_opts, work_items};
pub use client::{ApiClient, Uploader, classify};
pub use display::{render_result, write_result, write_titled};
pub use validator::{allowed_extension, validate};
