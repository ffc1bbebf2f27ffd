//! Alert log
//!
//! Append-only, capacity-bounded list of timestamped messages shown in the UI.
//! Every component writes to it; once more than [`MAX_ALERT_ENTRIES`] entries
//! are stored the oldest one is dropped.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Maximum number of alerts kept in memory
pub const MAX_ALERT_ENTRIES: usize = 200;

/// How an alert is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl AlertLevel {
    pub fn is_failure(&self) -> bool {
        matches!(self, AlertLevel::Warning | AlertLevel::Error)
    }
}

/// A single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEntry {
    pub timestamp: DateTime<Local>,
    pub level: AlertLevel,
    pub message: String,
}

impl std::fmt::Display for AlertEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Shared alert log
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    entries: Arc<RwLock<VecDeque<AlertEntry>>>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current wall-clock time
    pub async fn append(&self, level: AlertLevel, message: impl Into<String>) {
        let entry = AlertEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
        };

        match level {
            AlertLevel::Info | AlertLevel::Success => info!(alert = %entry.message),
            AlertLevel::Warning => warn!(alert = %entry.message),
            AlertLevel::Error => error!(alert = %entry.message),
        }

        let mut entries = self.entries.write().await;
        entries.push_back(entry);

        // Trim to max buffer size
        if entries.len() > MAX_ALERT_ENTRIES {
            entries.pop_front();
        }
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.append(AlertLevel::Info, message).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.append(AlertLevel::Success, message).await;
    }

    pub async fn warning(&self, message: impl Into<String>) {
        self.append(AlertLevel::Warning, message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.append(AlertLevel::Error, message).await;
    }

    /// Copy of all entries, oldest first
    pub async fn snapshot(&self) -> Vec<AlertEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Number of entries whose message contains `needle`
    pub async fn count_matching(&self, needle: &str) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.message.contains(needle))
            .count()
    }
}
