//! Access key resolution: flag → env var → .env in working dir → config file.

use anyhow::{Result, bail};
use log::debug;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::utils::pstorage_toml::PstorageToml;

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn try_env_then_dotenv(dir: &Path) -> Option<String> {
    let key = PackagePaths::get().api_key_env();
    if let Some(s) = std::env::var(key).ok().as_deref().and_then(non_blank) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        // Reads the file without touching the process environment.
        let found = dotenvy::from_path_iter(&env_path)
            .ok()?
            .filter_map(|item| item.ok())
            .find(|(k, _)| k == key);
        if let Some((_, v)) = found {
            return non_blank(&v);
        }
    }
    None
}

/// Resolve the access key in precedence order. `dir` is where `.env` is looked up.
pub fn resolve_api_key(
    flag: Option<&str>,
    dir: &Path,
    file: Option<&PstorageToml>,
) -> Result<String> {
    if let Some(k) = flag.and_then(non_blank) {
        debug!("API key from command line");
        return Ok(k);
    }
    if let Some(k) = try_env_then_dotenv(dir) {
        debug!("API key from environment");
        return Ok(k);
    }
    if let Some(k) = file.and_then(PstorageToml::api_key) {
        debug!("API key from config file");
        return Ok(k);
    }
    bail!(
        "no API key: pass --api-key, set {} or add api_key to ~/{}",
        PackagePaths::get().api_key_env(),
        PackagePaths::get().config_filename()
    )
}
