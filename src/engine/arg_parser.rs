use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::VariantSelection;

/// Command-line client for the pstorage image host.
#[derive(Clone, Debug, Parser)]
#[command(name = "pstorage", version)]
#[command(about = "Upload images or image URLs to pstorage and print the resulting URLs.")]
#[command(
    after_help = "Examples:\n  pstorage upload a.png dir/*.jpg --thumb\n  pstorage --config my.toml url https://example.com/image.jpeg"
)]
pub struct Cli {
    /// Config file. Default: ~/.pstorage.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API key. Overrides PSTORAGE_API_KEY and the config file.
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Upload endpoint.
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Workers per stage (validation and upload).
    #[arg(long, short = 'w', global = true, value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Verbose output.
    #[arg(long, short = 'v', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Upload image files (.png, .jpg, .jpeg). Directories are rejected.
    Upload {
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        variants: VariantArgs,
    },
    /// Upload images from absolute URLs.
    Url {
        #[arg(value_name = "URL", required = true, num_args = 1..)]
        urls: Vec<String>,

        #[command(flatten)]
        variants: VariantArgs,
    },
}

/// Which URLs to print. None set: print the viewer URL.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct VariantArgs {
    /// Print original url
    #[arg(long)]
    pub original: bool,

    /// Print large url
    #[arg(long)]
    pub large: bool,

    /// Print medium url
    #[arg(long)]
    pub medium: bool,

    /// Print thumb url
    #[arg(long)]
    pub thumb: bool,
}

impl From<VariantArgs> for VariantSelection {
    fn from(a: VariantArgs) -> Self {
        VariantSelection {
            original: a.original,
            large: a.large,
            medium: a.medium,
            thumb: a.thumb,
        }
    }
}

impl Commands {
    pub fn variants(&self) -> VariantArgs {
        match self {
            Commands::Upload { variants, .. } | Commands::Url { variants, .. } => *variants,
        }
    }
}
