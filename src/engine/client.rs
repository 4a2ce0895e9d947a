//! Blocking HTTP client for the image host. One outbound call per upload, no retry.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use std::error::Error as StdError;
use std::path::Path;

use crate::error::PipelineError;
use crate::utils::config::{ApiConsts, PackagePaths, TimeoutConsts};
use crate::{Opts, UploadResponse, UploadResult, ValidatedItem};

/// Performs the network call for one validated item. Shared read-only by all upload workers.
pub trait Uploader: Send + Sync {
    fn upload(&self, item: &ValidatedItem) -> Result<UploadResult, PipelineError>;
}

/// JSON body of a file upload.
#[derive(Debug, Serialize)]
struct UploadFileRequest<'a> {
    key: &'a str,
    filename: &'a str,
    source: String,
}

/// Client for the upload endpoint. Holds the access key; cheap to share behind `Arc`.
pub struct ApiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl ApiClient {
    /// Build from run options. Fails on an unparsable endpoint or TLS backend init failure.
    pub fn new(opts: &Opts) -> Result<Self> {
        let endpoint = Url::parse(&opts.endpoint)
            .with_context(|| format!("invalid endpoint {}", opts.endpoint))?;
        let client = Client::builder()
            .timeout(opts.timeout)
            .connect_timeout(TimeoutConsts::CONNECT)
            .user_agent(PackagePaths::get().user_agent())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            endpoint,
            api_key: opts.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST the file as base64 inside a JSON body.
    pub fn upload_file(&self, path: &Path) -> Result<UploadResult, PipelineError> {
        let reference = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| PipelineError::Unreadable {
            reference: reference.clone(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| reference.clone());
        let body = UploadFileRequest {
            key: &self.api_key,
            filename: &filename,
            source: STANDARD.encode(&bytes),
        };
        debug!("POST {} ({} bytes)", reference, bytes.len());
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .map_err(|e| transport(&reference, &e))?;
        decode_response(&reference, resp)
    }

    /// GET with the key and source URL as query parameters; the host fetches the image.
    pub fn upload_url(&self, source: &str) -> Result<UploadResult, PipelineError> {
        debug!("GET {}", source);
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str()), ("source", source)])
            .send()
            .map_err(|e| transport(source, &e))?;
        decode_response(source, resp)
    }
}

impl Uploader for ApiClient {
    fn upload(&self, item: &ValidatedItem) -> Result<UploadResult, PipelineError> {
        match item {
            ValidatedItem::File(path) => self.upload_file(path),
            ValidatedItem::Url(url) => self.upload_url(url),
        }
    }
}

/// Decode the body regardless of HTTP status, then classify by the body's `status` field.
fn decode_response(reference: &str, resp: Response) -> Result<UploadResult, PipelineError> {
    let http_status = resp.status();
    let body = resp.text().map_err(|e| transport(reference, &e))?;
    let decoded: UploadResponse = match serde_json::from_str(&body) {
        Ok(d) => d,
        Err(_) if http_status.as_u16() == ApiConsts::STATUS_FORBIDDEN => {
            return Err(PipelineError::AccessForbidden {
                reference: reference.to_string(),
            });
        }
        Err(e) => {
            return Err(PipelineError::Transport {
                reference: reference.to_string(),
                message: format!("invalid response body (HTTP {http_status}): {e}"),
            });
        }
    };
    classify(reference, decoded)
}

/// Map a decoded response to a result or a per-item / fatal error.
pub fn classify(reference: &str, decoded: UploadResponse) -> Result<UploadResult, PipelineError> {
    match decoded.status {
        ApiConsts::STATUS_SUCCESS => Ok(UploadResult::from_response(reference, decoded)),
        ApiConsts::STATUS_FORBIDDEN => Err(PipelineError::AccessForbidden {
            reference: reference.to_string(),
        }),
        status => Err(PipelineError::RemoteRejected {
            reference: reference.to_string(),
            status,
            message: if decoded.message.is_empty() {
                "no message from server".to_string()
            } else {
                decoded.message
            },
        }),
    }
}

/// reqwest's Display omits the cause ("error sending request"); append the source chain.
fn transport(reference: &str, e: &reqwest::Error) -> PipelineError {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    PipelineError::Transport {
        reference: reference.to_string(),
        message,
    }
}
