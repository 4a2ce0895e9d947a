//! CLI command handler: resolve options once, then run the batch for `upload` or `url`.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use std::time::Duration;

use crate::batch::run_batch;
use crate::engine::arg_parser::{Cli, Commands};
use crate::utils::{
    PstorageToml, apply_file_to_opts, load_pstorage_toml, resolve_api_key, setup_logging,
};
use crate::{Opts, WorkItem};

/// Build [`Opts`]: defaults → config file → CLI flags. The API key follows its own precedence;
/// `.env` is looked up in `dir`.
pub fn setup_opts(cli: &Cli, file: Option<&PstorageToml>, dir: &Path) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(f) = file {
        apply_file_to_opts(f, &mut opts);
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(e) = &cli.endpoint {
        opts.endpoint = e.clone();
    }
    if let Some(secs) = cli.timeout {
        opts.timeout = Duration::from_secs(secs);
    }
    if let Some(w) = cli.workers {
        opts.workers = w;
    }
    opts.variants = cli.command.variants().into();
    opts.api_key = resolve_api_key(cli.api_key.as_deref(), dir, file)?;
    Ok(opts)
}

/// Items for the selected subcommand, in argument order.
pub fn work_items(command: &Commands) -> Vec<WorkItem> {
    match command {
        Commands::Upload { files, .. } => files.iter().map(WorkItem::file).collect(),
        Commands::Url { urls, .. } => urls.iter().cloned().map(WorkItem::url).collect(),
    }
}

/// Run the selected subcommand.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let file = load_pstorage_toml(cli.config.as_deref())?;
    let cwd = std::env::current_dir().context("read current directory")?;
    let opts = setup_opts(cli, file.as_ref().map(|(_, f)| f), &cwd)?;
    setup_logging(opts.verbose);
    if let Some((path, _)) = &file {
        debug!("Using config file: {}", path.display());
    }
    let items = work_items(&cli.command);
    debug!("{} items, {} workers", items.len(), opts.workers);
    run_batch(items, &opts)?;
    Ok(())
}
