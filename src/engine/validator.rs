//! Eligibility checks run by the validation stage. No side effects beyond an open/close probe.

use reqwest::Url;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::PipelineError;
use crate::utils::config::{ALLOWED_EXTENSIONS, ALLOWED_URL_SCHEMES};
use crate::{ItemKind, ValidatedItem, WorkItem};

/// Decide whether `item` may be uploaded.
pub fn validate(item: &WorkItem) -> Result<ValidatedItem, PipelineError> {
    match item.kind() {
        ItemKind::File => validate_file(item.reference()),
        ItemKind::Url => validate_url(item.reference()),
    }
}

/// Lowercased extension of `path` when it is on the allow-list. Matches the full list.
pub fn allowed_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn validate_file(reference: &str) -> Result<ValidatedItem, PipelineError> {
    let path = Path::new(reference);
    let meta = std::fs::metadata(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PipelineError::NotFound {
            reference: reference.to_string(),
        },
        // Permission on a parent, a file used as a directory, symlink loops.
        _ => PipelineError::Unreadable {
            reference: reference.to_string(),
            source,
        },
    })?;
    if !meta.is_file() {
        return Err(PipelineError::NotAFile {
            reference: reference.to_string(),
        });
    }
    if allowed_extension(path).is_none() {
        return Err(PipelineError::UnsupportedType {
            reference: reference.to_string(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned()),
        });
    }
    // Probe only; the handle is dropped immediately.
    File::open(path).map_err(|source| PipelineError::Unreadable {
        reference: reference.to_string(),
        source,
    })?;
    Ok(ValidatedItem::File(path.to_path_buf()))
}

fn validate_url(reference: &str) -> Result<ValidatedItem, PipelineError> {
    let malformed = |reason: String| PipelineError::MalformedUrl {
        reference: reference.to_string(),
        reason,
    };
    let url = Url::parse(reference.trim()).map_err(|e| malformed(e.to_string()))?;
    if !ALLOWED_URL_SCHEMES.contains(&url.scheme()) {
        return Err(malformed(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(malformed("missing host".to_string()));
    }
    Ok(ValidatedItem::Url(url.to_string()))
}
