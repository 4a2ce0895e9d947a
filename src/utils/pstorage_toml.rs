//! Load `.pstorage.toml` (CLI only). The lib takes everything through [`Opts`]; this file
//! only seeds `Opts` before CLI flags are applied.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct PstorageToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    workers: Option<usize>,
    verbose: Option<bool>,
}

impl PstorageToml {
    /// Access key from the file, if set and non-blank.
    pub fn api_key(&self) -> Option<String> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }
}

/// Default config location: `$HOME/.pstorage.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(PackagePaths::get().config_filename()))
}

/// Parse config file contents.
pub fn parse_pstorage_toml(s: &str) -> Result<PstorageToml> {
    toml::from_str(s).context("parse config file")
}

/// Load the config file.
///
/// - `explicit: Some(path)` (from `--config`): the file must exist and parse.
/// - `explicit: None`: the default location is tried; a missing file is not an error, a malformed
///   one is.
///
/// Runs before logging is set up (the file may turn on verbose), so it does not log.
pub fn load_pstorage_toml(explicit: Option<&Path>) -> Result<Option<(PathBuf, PstorageToml)>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.is_file() => p,
            _ => return Ok(None),
        },
    };
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let file = parse_pstorage_toml(&s).with_context(|| path.display().to_string())?;
    Ok(Some((path, file)))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$file_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
/// The access key is resolved separately, see [`resolve_api_key`](crate::utils::resolve_api_key).
pub fn apply_file_to_opts(file: &PstorageToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, endpoint => endpoint);
    apply_file_opt!(s, opts, workers => workers);
    apply_file_opt!(s, opts, verbose => verbose);
    if let Some(secs) = s.timeout_secs {
        opts.timeout = Duration::from_secs(secs);
    }
}
