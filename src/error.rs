use std::io;
use thiserror::Error;

/// Per-item failure. Flows only to the error sink; never retried.
///
/// Every variant carries the offending reference and renders as one line.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{reference} : no such file or directory")]
    NotFound { reference: String },

    #[error("{reference} : only files are supported")]
    NotAFile { reference: String },

    #[error("{reference} : invalid file type{}", extension_note(.extension))]
    UnsupportedType {
        reference: String,
        extension: Option<String>,
    },

    #[error("{reference} : unable to open file: {source}")]
    Unreadable {
        reference: String,
        #[source]
        source: io::Error,
    },

    #[error("{reference} : malformed url: {reason}")]
    MalformedUrl { reference: String, reason: String },

    #[error("{reference} : transport error: {message}")]
    Transport { reference: String, message: String },

    #[error("error uploading {reference} : {message} (status {status})")]
    RemoteRejected {
        reference: String,
        status: u16,
        message: String,
    },

    #[error("unable to upload {reference} : access forbidden, the API key was refused")]
    AccessForbidden { reference: String },
}

fn extension_note(ext: &Option<String>) -> String {
    match ext {
        Some(e) => format!(" .{e} (expected .png, .jpg or .jpeg)"),
        None => " (no extension; expected .png, .jpg or .jpeg)".to_string(),
    }
}

impl PipelineError {
    pub fn reference(&self) -> &str {
        match self {
            PipelineError::NotFound { reference }
            | PipelineError::NotAFile { reference }
            | PipelineError::UnsupportedType { reference, .. }
            | PipelineError::Unreadable { reference, .. }
            | PipelineError::MalformedUrl { reference, .. }
            | PipelineError::Transport { reference, .. }
            | PipelineError::RemoteRejected { reference, .. }
            | PipelineError::AccessForbidden { reference } => reference,
        }
    }

    /// Raised by the validator (before any network call).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipelineError::NotFound { .. }
                | PipelineError::NotAFile { .. }
                | PipelineError::UnsupportedType { .. }
                | PipelineError::Unreadable { .. }
                | PipelineError::MalformedUrl { .. }
        )
    }

    /// Halts the whole batch: the key is refused, other items would fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::AccessForbidden { .. })
    }
}
