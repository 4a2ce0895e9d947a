//! Application configuration constants.
//! Endpoint, pool sizing, timeouts and the extension allow-list in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    api_key_env: String,
    user_agent: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                api_key_env: format!("{}_API_KEY", pkg.to_uppercase()),
                user_agent: format!("{pkg}/{}", env!("CARGO_PKG_VERSION")),
            }
        })
    }

    /// Config file name looked up in the home directory (e.g. `.pstorage.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable holding the access key (e.g. `PSTORAGE_API_KEY`).
    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

// ---- Remote API ----

/// Remote endpoint and the status codes it reports in the response body.
pub struct ApiConsts;

impl ApiConsts {
    pub const DEFAULT_ENDPOINT: &'static str = "https://pstorage.space/api/1/upload";
    /// `status` value of an accepted upload.
    pub const STATUS_SUCCESS: u16 = 200;
    /// `status` value meaning the key itself is refused; aborts the batch.
    pub const STATUS_FORBIDDEN: u16 = 403;
}

// ---- HTTP timeouts ----

/// Finite timeouts for every outbound call. No retry is attempted on expiry.
pub struct TimeoutConsts;

impl TimeoutConsts {
    /// Whole-request timeout (seconds). Covers body upload of large images.
    pub const REQUEST_SECS: u64 = 30;
    /// TCP/TLS connect timeout.
    pub const CONNECT: Duration = Duration::from_secs(10);
}

// ---- Worker pools ----

/// Pool sizing for the validation and upload stages.
pub struct WorkerPoolLimits;

impl WorkerPoolLimits {
    /// Workers per stage when neither CLI nor config file sets one.
    pub const DEFAULT_WORKERS: usize = 3;
    /// Lower bound; a stage always has at least one worker.
    pub const MIN_WORKERS: usize = 1;
    /// Upper bound; keeps a misconfigured file from opening hundreds of connections.
    pub const MAX_WORKERS: usize = 32;
}

/// Capacity of each hand-off queue, per worker. Small on purpose: producers block
/// (backpressure) rather than buffering the whole batch.
pub const QUEUE_SLOTS_PER_WORKER: usize = 2;

// ---- Validation ----

/// Extensions (lowercase, without the dot) accepted for file uploads.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// URL schemes accepted for URL uploads.
pub const ALLOWED_URL_SCHEMES: [&str; 2] = ["http", "https"];
