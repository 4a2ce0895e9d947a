//! Public types for the upload pipeline: work items, validated items, results, options.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::config::{ApiConsts, TimeoutConsts, WorkerPoolLimits};

/// Discriminant of a [`WorkItem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Url,
}

/// One input reference as given on the command line. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    reference: String,
    kind: ItemKind,
}

impl WorkItem {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            reference: path.as_ref().to_string_lossy().into_owned(),
            kind: ItemKind::File,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            reference: url.into(),
            kind: ItemKind::Url,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

/// A [`WorkItem`] confirmed eligible for upload. Only the validator constructs one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidatedItem {
    /// Existing, readable regular file with an allow-listed extension.
    File(PathBuf),
    /// Absolute http(s) URL, canonicalized.
    Url(String),
}

impl ValidatedItem {
    /// Reference shown to the user (path as given, or canonical URL).
    pub fn reference(&self) -> String {
        match self {
            ValidatedItem::File(p) => p.display().to_string(),
            ValidatedItem::Url(u) => u.clone(),
        }
    }
}

/// One rendered size of an uploaded image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ImageVariant {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub url: String,
}

/// Decoded response body of the remote API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub original_filename: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_viewer: String,
    #[serde(default)]
    pub original: ImageVariant,
    #[serde(default)]
    pub large: ImageVariant,
    #[serde(default)]
    pub medium: ImageVariant,
    #[serde(default)]
    pub thumb: ImageVariant,
}

/// Normalized outcome of one accepted upload: the source reference plus the decoded response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResult {
    pub reference: String,
    pub status: u16,
    pub message: String,
    pub original_filename: String,
    pub url: String,
    pub url_viewer: String,
    pub original: ImageVariant,
    pub large: ImageVariant,
    pub medium: ImageVariant,
    pub thumb: ImageVariant,
}

impl UploadResult {
    pub fn from_response(reference: impl Into<String>, r: UploadResponse) -> Self {
        Self {
            reference: reference.into(),
            status: r.status,
            message: r.message,
            original_filename: r.original_filename,
            url: r.url,
            url_viewer: r.url_viewer,
            original: r.original,
            large: r.large,
            medium: r.medium,
            thumb: r.thumb,
        }
    }

    pub fn variant(&self, v: Variant) -> &ImageVariant {
        match v {
            Variant::Original => &self.original,
            Variant::Large => &self.large,
            Variant::Medium => &self.medium,
            Variant::Thumb => &self.thumb,
        }
    }

    /// URL of variant `v`. When the response left the block empty, derive it from `url` by
    /// inserting the size suffix before the extension (`name.th.jpg`, `name.md.jpg`).
    pub fn variant_url(&self, v: Variant) -> String {
        let block = self.variant(v);
        if !block.url.is_empty() {
            return block.url.clone();
        }
        match v.host_suffix() {
            Some(suffix) => insert_suffix(&self.url, suffix),
            None => self.url.clone(),
        }
    }
}

/// `https://h/a/b.png?v=2` + `th` → `https://h/a/b.th.png?v=2`. Only the last path segment is
/// touched; query and fragment are carried over as-is.
fn insert_suffix(url: &str, suffix: &str) -> String {
    let (path, tail) = url.split_at(url.find(['?', '#']).unwrap_or(url.len()));
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let at = name_start + dot;
            format!("{}.{}{}{}", &path[..at], suffix, &path[at..], tail)
        }
        _ => url.to_string(),
    }
}

/// Image rendition produced by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Original,
    Large,
    Medium,
    Thumb,
}

impl Variant {
    /// Display order.
    pub const ALL: [Variant; 4] = [
        Variant::Original,
        Variant::Large,
        Variant::Medium,
        Variant::Thumb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Original => "Original URL",
            Variant::Large => "Large URL",
            Variant::Medium => "Medium URL",
            Variant::Thumb => "Thumb URL",
        }
    }

    fn host_suffix(self) -> Option<&'static str> {
        match self {
            Variant::Medium => Some("md"),
            Variant::Thumb => Some("th"),
            Variant::Original | Variant::Large => None,
        }
    }
}

/// Which variant URLs to print. Nothing selected → the viewer URL is printed instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VariantSelection {
    pub original: bool,
    pub large: bool,
    pub medium: bool,
    pub thumb: bool,
}

impl VariantSelection {
    pub fn is_selected(&self, v: Variant) -> bool {
        match v {
            Variant::Original => self.original,
            Variant::Large => self.large,
            Variant::Medium => self.medium,
            Variant::Thumb => self.thumb,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.original || self.large || self.medium || self.thumb)
    }

    /// Selected variants in display order.
    pub fn selected(&self) -> impl Iterator<Item = Variant> + '_ {
        Variant::ALL.into_iter().filter(|v| self.is_selected(*v))
    }
}

/// Run configuration. Built once at startup (file, then CLI) and passed by reference.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Access key sent with every request.
    pub api_key: String,
    /// Upload endpoint (`POST` for files, `GET` for URLs).
    pub endpoint: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Workers per stage (validation and upload).
    pub workers: usize,
    /// Variant URLs to print.
    pub variants: VariantSelection,
    /// Debug logging.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: ApiConsts::DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(TimeoutConsts::REQUEST_SECS),
            workers: WorkerPoolLimits::DEFAULT_WORKERS,
            variants: VariantSelection::default(),
            verbose: false,
        }
    }
}
