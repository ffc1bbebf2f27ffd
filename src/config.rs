use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

/// Backend address used when the configured URL is blank
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

pub const DEFAULT_BUCKET_NAME: &str = "computer-vision-analysis";

/// Records older than this many days are removed at startup
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Number of image records requested for the analytics view
pub const DEFAULT_ANALYTICS_LIMIT: u32 = 1000;

/// User-editable backend address
///
/// Every remote call resolves the URL at call time, so edits take effect on
/// the next request. Clones share the same value.
#[derive(Debug, Clone)]
pub struct BaseUrl {
    value: Arc<watch::Sender<String>>,
}

impl BaseUrl {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        check_scheme(&url);

        let (tx, _) = watch::channel(url);
        Self {
            value: Arc::new(tx),
        }
    }

    /// The raw value as the user typed it
    pub fn raw(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn set(&self, url: impl Into<String>) {
        let url = url.into();
        check_scheme(&url);

        self.value.send_replace(url);
    }

    /// The address requests are sent to
    ///
    /// Blank input falls back to [`DEFAULT_API_URL`]. A value without an
    /// `http://` or `https://` prefix is used as is.
    pub fn resolve(&self) -> String {
        let raw = self.value.borrow();
        let url = raw.trim();

        if url.is_empty() {
            return DEFAULT_API_URL.to_string();
        }

        url.trim_end_matches('/').to_string()
    }
}

/// Warn once per stored value about a missing `http://` or `https://` prefix
fn check_scheme(url: &str) {
    let url = url.trim();
    if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
        warn!("invalid URL format: {url}, attempting to use anyway");
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Per-call timeouts for each backend endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// `GET /camera`
    pub frame: Duration,

    /// `POST /camera` (start and stop)
    pub command: Duration,

    /// `POST /s3/bucket/delete`
    pub bucket_delete: Duration,

    /// `POST /db/cleanup`
    pub cleanup: Duration,

    /// `POST /db/delete-file`
    pub delete_file: Duration,

    /// `GET /db/image`
    pub images: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            frame: Duration::from_secs(5),
            command: Duration::from_secs(10),
            bucket_delete: Duration::from_secs(60),
            cleanup: Duration::from_secs(30),
            delete_file: Duration::from_secs(10),
            images: Duration::from_secs(15),
        }
    }
}

/// Cadence of the frame poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause between two fetches (~10 frames per second)
    pub refresh_interval: Duration,

    /// Extra pause after a failed fetch
    pub failure_cooldown: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(100),
            failure_cooldown: Duration::from_secs(2),
        }
    }
}
