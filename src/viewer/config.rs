//! Configuration for the TUI viewer

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SessionSettings;
use crate::config::{
    DEFAULT_ANALYTICS_LIMIT, DEFAULT_API_URL, DEFAULT_BUCKET_NAME, DEFAULT_RETENTION_DAYS,
    PollSettings, Timeouts,
};

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend URL (default: http://localhost:5000)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bucket removed by self-destruct
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    /// Records older than this are deleted at startup (default: 30)
    #[serde(default = "default_retention_days")]
    pub startup_retention_days: u32,

    /// Image records fetched for analytics (default: 1000)
    #[serde(default = "default_analytics_limit")]
    pub analytics_limit: u32,

    #[serde(default = "default_frame_timeout")]
    pub frame_timeout_ms: u64,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,

    #[serde(default = "default_bucket_delete_timeout")]
    pub bucket_delete_timeout_ms: u64,

    #[serde(default = "default_cleanup_timeout")]
    pub cleanup_timeout_ms: u64,

    #[serde(default = "default_delete_file_timeout")]
    pub delete_file_timeout_ms: u64,

    #[serde(default = "default_images_timeout")]
    pub images_timeout_ms: u64,

    /// Pause between frame fetches (default: 100ms)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Pause after a failed frame fetch (default: 2s)
    #[serde(default = "default_failure_cooldown")]
    pub failure_cooldown_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_bucket_name() -> String {
    DEFAULT_BUCKET_NAME.to_string()
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

fn default_analytics_limit() -> u32 {
    DEFAULT_ANALYTICS_LIMIT
}

fn default_frame_timeout() -> u64 {
    5_000
}

fn default_command_timeout() -> u64 {
    10_000
}

fn default_bucket_delete_timeout() -> u64 {
    60_000
}

fn default_cleanup_timeout() -> u64 {
    30_000
}

fn default_delete_file_timeout() -> u64 {
    10_000
}

fn default_images_timeout() -> u64 {
    15_000
}

fn default_refresh_interval() -> u64 {
    100
}

fn default_failure_cooldown() -> u64 {
    2_000
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(|p| p.to_path_buf()).or_else(|| {
            // Try default locations
            let config_dir = dirs::config_dir()?;
            let default_path = config_dir.join("camwatch/config.toml");
            if default_path.exists() {
                Some(default_path)
            } else {
                None
            }
        });

        if let Some(path) = config_path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            // Use defaults
            Ok(Self::default())
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            frame: Duration::from_millis(self.frame_timeout_ms),
            command: Duration::from_millis(self.command_timeout_ms),
            bucket_delete: Duration::from_millis(self.bucket_delete_timeout_ms),
            cleanup: Duration::from_millis(self.cleanup_timeout_ms),
            delete_file: Duration::from_millis(self.delete_file_timeout_ms),
            images: Duration::from_millis(self.images_timeout_ms),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            refresh_interval: Duration::from_millis(self.refresh_interval_ms),
            failure_cooldown: Duration::from_millis(self.failure_cooldown_ms),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            timeouts: self.timeouts(),
            poll: self.poll_settings(),
            bucket_name: self.bucket_name.clone(),
            retention_days: self.startup_retention_days,
            analytics_limit: self.analytics_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            bucket_name: default_bucket_name(),
            startup_retention_days: default_retention_days(),
            analytics_limit: default_analytics_limit(),
            frame_timeout_ms: default_frame_timeout(),
            command_timeout_ms: default_command_timeout(),
            bucket_delete_timeout_ms: default_bucket_delete_timeout(),
            cleanup_timeout_ms: default_cleanup_timeout(),
            delete_file_timeout_ms: default_delete_file_timeout(),
            images_timeout_ms: default_images_timeout(),
            refresh_interval_ms: default_refresh_interval(),
            failure_cooldown_ms: default_failure_cooldown(),
        }
    }
}
