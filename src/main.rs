//! pstorage CLI: upload image files or image URLs and print the resulting URLs.

use anyhow::Result;
use clap::Parser;
use pstorage::engine::arg_parser::Cli;
use pstorage::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
